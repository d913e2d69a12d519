//! Helper macro for declaring port error enums.
//!
//! Every driven port declares its failures as a small thiserror enum with
//! snake_case constructor functions that accept `impl Into<T>` for each
//! field, so call sites can pass `&str` where the variant stores `String`.

macro_rules! define_port_error {
    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),* $(,)? } => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field : $ty),* },
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant { $($field : $ty),* });
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum SamplePortError {
            Broken { message: String } => "broken: {message}",
            Stalled { attempts: u32 } => "stalled after {attempts} attempts",
        }
    }

    #[test]
    fn string_fields_accept_str_slices() {
        let err = SamplePortError::broken("lock poisoned");
        assert_eq!(err.to_string(), "broken: lock poisoned");
    }

    #[test]
    fn non_string_fields_keep_their_type() {
        let err = SamplePortError::stalled(3_u32);
        assert_eq!(err.to_string(), "stalled after 3 attempts");
    }
}
