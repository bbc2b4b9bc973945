pub(crate) mod blur;
pub(crate) mod composite;
pub(crate) mod cover;
pub(crate) mod raster;
pub(crate) mod resize;
pub(crate) mod shadow;
pub(crate) mod shape;
