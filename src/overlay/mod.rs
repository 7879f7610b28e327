pub(crate) mod choreo;
pub(crate) mod ease;
pub(crate) mod track;
