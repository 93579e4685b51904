/// Zero bytes needed to bring `len` up to a 4-byte boundary.
#[inline]
pub(crate) fn padding(len: usize) -> usize {
    (4 - len % 4) % 4
}

/// `len` rounded up to a 4-byte boundary.
#[inline]
pub(crate) fn padded(len: usize) -> usize {
    len + padding(len)
}

/// Byte sizes of one serialized mip level block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LevelBlock {
    /// Sum of the padded sub-images.
    pub images: usize,
    /// Trailing mip padding after the sub-images.
    pub mip_padding: usize,
}

impl LevelBlock {
    pub fn new<I>(image_sizes: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let images = image_sizes.into_iter().map(padded).sum();
        LevelBlock {
            images,
            mip_padding: padding(images),
        }
    }

    /// Image-size field plus all padded content.
    pub fn total(&self) -> usize {
        4 + self.images + self.mip_padding
    }
}
