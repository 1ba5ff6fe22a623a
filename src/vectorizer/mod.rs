use image::RgbaImage;

use crate::PixtraceResult;

/// A trait representing an algorithm that can turn a raster image into a vector representation.
pub trait RasterVectorizer {
    type Options;
    type Output;

    fn vectorize(&self, image: &RgbaImage, options: &Self::Options)
    -> PixtraceResult<Self::Output>;
}

pub mod region;
