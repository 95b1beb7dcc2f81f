macro_rules! noop {
    () => {{}};
}
pub(crate) use noop;
