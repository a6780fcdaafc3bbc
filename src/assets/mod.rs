pub(crate) mod decode;
pub(crate) mod logo;
pub(crate) mod photo;
pub(crate) mod text;
