/// Creates a read-only [`Path`](crate::Path) to a field.
///
/// The value is cloned on read.
///
/// # Examples
///
/// ```
/// use vc_path::{Readable, path};
///
/// struct Size { width: u32, height: u32 }
/// struct Window { size: Size }
///
/// let width = path!(Window => size.width);
/// let window = Window { size: Size { width: 640, height: 480 } };
///
/// assert_eq!(width.get(&window), 640);
/// ```
#[macro_export]
macro_rules! path {
    ($root:ty => $($field:tt).+) => {
        $crate::Path::<$root, _>::new(|root: &$root| {
            ::core::clone::Clone::clone(&root$(.$field)+)
        })
    };
}

/// Creates a [`WritablePath`](crate::WritablePath) to a field.
///
/// Every expansion is a distinct path: two invocations with the same
/// arguments do not compare equal.
///
/// # Examples
///
/// ```
/// use vc_path::{Readable, Writable, writable_path};
///
/// struct Point(i32, i32);
/// struct Sprite { origin: Point }
///
/// let y = writable_path!(Sprite => origin.1);
/// let mut sprite = Sprite { origin: Point(0, 0) };
///
/// y.set(&mut sprite, 3);
/// assert_eq!(y.get(&sprite), 3);
/// assert_ne!(y, writable_path!(Sprite => origin.1));
/// ```
#[macro_export]
macro_rules! writable_path {
    ($root:ty => $($field:tt).+) => {
        $crate::WritablePath::<$root, _>::new(
            |root: &$root| ::core::clone::Clone::clone(&root$(.$field)+),
            |root: &mut $root, value| root$(.$field)+ = value,
        )
    };
}
