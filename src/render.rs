pub(crate) mod frame;
pub(crate) mod layout;
pub(crate) mod pixmap;
pub(crate) mod renderer;
pub(crate) mod report;
pub(crate) mod surface;
pub(crate) mod text;
