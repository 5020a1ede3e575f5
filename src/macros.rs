#[macro_export]
macro_rules! boxentry {
    ( $key: expr, $value: expr) => {
        Box::new($crate::hashmap::Entry {
            key: $key.into(),
            value: $value.into(),
            next: None,
        })
    };
}

#[macro_export]
macro_rules! entry {
    ( $key: expr, $value: expr) => {
        $crate::hashmap::Entry {
            key: $key.into(),
            value: $value.into(),
            next: None,
        }
    };
}
