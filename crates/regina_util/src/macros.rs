/// Declares index newtypes over unsigned integers, ready to key a
/// [`TiVec`](crate::ti::TiVec).
///
/// ```
/// regina_util::typed_index_struct! {
///     /// Tetrahedron number.
///     pub struct TetIndex(pub u32);
/// }
/// assert_eq!(TetIndex(3).to_string(), "3");
/// assert_eq!(format!("{:?}", TetIndex(3)), "TetIndex#3");
/// ```
#[macro_export]
macro_rules! typed_index_struct {
    ($($(#[$meta:meta])* $vis:vis struct $name:ident($field_vis:vis $int:ty);)+) => {$(
        $(#[$meta])*
        #[derive(Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        $vis struct $name($field_vis $int);

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0, f)
            }
        }
        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, concat!(stringify!($name), "#{}"), self.0)
            }
        }

        impl $crate::ti::TypedIndex for $name {
            // The top value stays free so that a full arena's length fits.
            const MAX: Self = Self(<$int>::MAX - 1);
            const MAX_INDEX: usize = Self::MAX.0 as usize;
            const TYPE_NAME: &'static str = stringify!($name);

            fn to_index(self) -> usize {
                self.0 as usize
            }
            fn try_from_index(i: usize) -> ::std::result::Result<Self, $crate::error::IndexOverflow> {
                <$int>::try_from(i)
                    .ok()
                    .filter(|&n| n <= Self::MAX.0)
                    .map(Self)
                    .ok_or_else($crate::error::IndexOverflow::new::<Self>)
            }
        }

        // Safety: every value produced by `to_u64` fits back into `$int`.
        impl $crate::ti::Fits64 for $name {
            unsafe fn from_u64(x: u64) -> Self {
                Self(x as $int)
            }
            fn to_u64(self) -> u64 {
                self.0 as u64
            }
        }
    )+};
}
