pub(crate) mod decode;
pub(crate) mod preload;
pub(crate) mod sequence;
pub(crate) mod source;
