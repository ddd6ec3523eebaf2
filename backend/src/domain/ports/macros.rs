//! Helper macro for declaring domain port error enums.

/// Declare a `thiserror` enum whose struct variants get snake_case helper
/// constructors accepting `impl Into<T>` for each field.
macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $field:ident : $ty:ty } => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $field: $ty },
            )*
        }

        impl $name {
            ::paste::paste! {
                $(
                    pub fn [<$variant:snake>]($field: impl Into<$ty>) -> Self {
                        Self::$variant { $field: $field.into() }
                    }
                )*
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        /// Error enum used only by this test.
        pub enum SamplePortError {
            Connection { message: String } => "sample connection failed: {message}",
            Query { message: String } => "sample query failed: {message}",
        }
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = SamplePortError::connection("refused");
        assert_eq!(err.to_string(), "sample connection failed: refused");
    }

    #[test]
    fn variants_compare_by_payload() {
        assert_eq!(SamplePortError::query("boom"), SamplePortError::query("boom"));
        assert_ne!(SamplePortError::query("boom"), SamplePortError::connection("boom"));
    }
}
