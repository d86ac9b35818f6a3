pub(crate) mod feed;
pub(crate) mod frame;
pub(crate) mod panel;
pub(crate) mod sequence;
