use tracing::warn;

/// Four floats, one RGBA32F texture element.
pub type Texel = [f32; 4];

/// Placement of fixed-height element blocks in a row-major texel grid.
///
/// Elements are laid out left to right in blocks of `rows_per_element` rows; element `i` occupies
/// column `i % width` in block `i / width`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridLayout {
    width: u32,
    height: u32,
    rows_per_element: u32,
}

impl GridLayout {
    /// Layout for `count` elements with rows limited to `max_dimension` texels.
    /// An empty layout still has one placeholder element slot.
    pub fn new(count: usize, rows_per_element: u32, max_dimension: u32) -> GridLayout {
        assert2::assert!(rows_per_element > 0);
        let max_dimension = max_dimension.max(1);
        let width = (count.min(max_dimension as usize) as u32).max(1);
        let blocks = (count.div_ceil(width as usize) as u32).max(1);
        let height = blocks * rows_per_element;

        if height > max_dimension {
            warn!(
                height,
                max_dimension,
                "Texel grid is taller than the maximum texture dimension"
            );
        }

        GridLayout {
            width,
            height,
            rows_per_element,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rows_per_element(&self) -> u32 {
        self.rows_per_element
    }

    /// Number of element slots, including unused ones in the last block.
    pub fn capacity(&self) -> usize {
        (self.width * (self.height / self.rows_per_element)) as usize
    }

    pub fn texel_count(&self) -> usize {
        (self.width * self.height) as usize
    }

    /// (x, y) texel coordinate of a row of an element.
    pub fn texel_position(&self, element: usize, row: u32) -> (u32, u32) {
        texel_position(element, row, self.width, self.rows_per_element)
    }

    pub fn texel_index(&self, element: usize, row: u32) -> usize {
        let (x, y) = self.texel_position(element, row);
        (y * self.width + x) as usize
    }
}

/// (x, y) texel coordinate of a row of an element, as the kernel computes it.
pub fn texel_position(element: usize, row: u32, width: u32, rows_per_element: u32) -> (u32, u32) {
    let x = (element % width as usize) as u32;
    let y = (element / width as usize) as u32 * rows_per_element + row;
    (x, y)
}

/// Zero-initialized RGBA32F grid with a [`GridLayout`].
#[derive(Clone, Debug, PartialEq)]
pub struct TexelGrid {
    layout: GridLayout,
    texels: Vec<Texel>,
}

impl TexelGrid {
    pub fn new(layout: GridLayout) -> TexelGrid {
        TexelGrid {
            layout,
            texels: vec![[0.0; 4]; layout.texel_count()],
        }
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn width(&self) -> u32 {
        self.layout.width
    }

    pub fn height(&self) -> u32 {
        self.layout.height
    }

    pub fn get(&self, element: usize, row: u32) -> Texel {
        self.texels[self.layout.texel_index(element, row)]
    }

    pub fn set(&mut self, element: usize, row: u32, texel: Texel) {
        let index = self.layout.texel_index(element, row);
        self.texels[index] = texel;
    }

    pub fn texels(&self) -> &[Texel] {
        &self.texels
    }

    /// Row-major floats, four per texel, ready for upload.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.texels)
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texels)
    }
}

/// Reads a texel out of raw row-major floats.
pub(super) fn read_texel(floats: &[f32], width: u32, (x, y): (u32, u32)) -> Texel {
    let start = ((y * width + x) * 4) as usize;
    let mut texel = [0.0; 4];
    texel.copy_from_slice(&floats[start..start + 4]);
    texel
}
