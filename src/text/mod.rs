pub(crate) mod font;
pub(crate) mod layout;
pub(crate) mod styled;
