//! Packed 1-bit frame buffer and coordinate mapping
//!
//! The buffer holds two pages back to back, each `rows × stride` bytes:
//!
//! ```text
//! [0 .. page)        next      written by set_point / clear
//! [page .. 2·page)   previous  what the panel currently shows
//! ```
//!
//! A page row is one line along the panel's long side (`rows = V`); its
//! bits run along the short side (`columns = H`), MSB first. A set bit is
//! white, a clear bit black, unless the invert flag is on.
//!
//! Logical coordinates go through the [`Orientation`] transform first and
//! are rejected when they fall outside the rotated screen.

use eink_specs::PanelProfile;

use crate::error::Error;

/// Pixel colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Colour {
    /// Black.
    Black,
    /// White.
    White,
    /// Checkerboard of black and white, resolved per pixel.
    Grey,
}

/// Screen rotation in quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Orientation {
    /// Native orientation: x along the short side.
    #[default]
    Rotate0,
    /// Quarter turn: x along the long side.
    Rotate90,
    /// Half turn.
    Rotate180,
    /// Three quarter turns.
    Rotate270,
}

impl Orientation {
    /// Orientation for an index, taken modulo 4.
    pub const fn from_index(index: u8) -> Self {
        match index & 3 {
            0 => Self::Rotate0,
            1 => Self::Rotate90,
            2 => Self::Rotate180,
            _ => Self::Rotate270,
        }
    }

    /// Index 0..=3.
    pub const fn index(self) -> u8 {
        match self {
            Self::Rotate0 => 0,
            Self::Rotate90 => 1,
            Self::Rotate180 => 2,
            Self::Rotate270 => 3,
        }
    }

    /// Whether x runs along the long side.
    pub const fn is_landscape(self) -> bool {
        matches!(self, Self::Rotate90 | Self::Rotate270)
    }
}

/// Frame-buffer dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Geometry {
    rows: u16,
    columns: u16,
    split: bool,
}

impl Geometry {
    /// `rows` lines of `columns` pixels each. `columns` is a multiple of 8.
    pub const fn new(rows: u16, columns: u16) -> Self {
        Self {
            rows,
            columns,
            split: false,
        }
    }

    /// Geometry of a model's panel.
    pub const fn from_profile(profile: &PanelProfile) -> Self {
        Self::new(profile.rows, profile.columns)
    }

    /// Same geometry with split-half addressing, used by two-controller
    /// panels: the lower half of every line lives in the second half of the
    /// page.
    #[must_use]
    pub const fn split(self) -> Self {
        Self {
            split: true,
            ..self
        }
    }

    /// Lines (long side, `V`).
    pub const fn rows(&self) -> u16 {
        self.rows
    }

    /// Pixels per line (short side, `H`).
    pub const fn columns(&self) -> u16 {
        self.columns
    }

    /// Whether split-half addressing is in use.
    pub const fn is_split(&self) -> bool {
        self.split
    }

    /// Bytes per line.
    pub const fn stride(&self) -> usize {
        (self.columns / 8) as usize
    }

    /// Bytes per page.
    #[allow(clippy::arithmetic_side_effects)] // u16 × (u16 / 8) fits usize
    pub const fn page_len(&self) -> usize {
        self.rows as usize * self.stride()
    }

    /// Bytes for both pages.
    #[allow(clippy::arithmetic_side_effects)] // 2 × page_len, see above
    pub const fn frame_buffer_len(&self) -> usize {
        self.page_len() * 2
    }

    /// Byte offset inside a page and bit mask for physical line `px`,
    /// position `py` along the line.
    ///
    /// Callers guarantee `px < rows` and `py < columns`.
    // px < rows and py < columns (u16), so every product and sum below stays
    // under 2 × page_len; the shift amount is py % 8 < 8.
    #[allow(clippy::arithmetic_side_effects)]
    fn locate(&self, px: u16, py: u16) -> (usize, u8) {
        let stride = self.stride();
        let mut py = py;
        let mut offset = 0usize;
        if self.split {
            let half = self.columns >> 1;
            if py >= half {
                py -= half;
                offset += self.page_len() >> 1;
            }
            offset += usize::from(px) * (stride >> 1) + usize::from(py >> 3);
        } else {
            offset = usize::from(px) * stride + usize::from(py >> 3);
        }
        let mask = 0x80u8 >> (py % 8);
        (offset, mask)
    }
}

/// Double-buffered 1-bit-per-pixel frame buffer over caller storage.
pub struct FrameBuffer<B> {
    buffer: B,
    geometry: Geometry,
    orientation: Orientation,
    invert: bool,
}

impl<B> FrameBuffer<B>
where
    B: AsMut<[u8]> + AsRef<[u8]>,
{
    /// Wrap storage. Until [`FrameBuffer::configure`] succeeds the geometry
    /// is empty and every coordinate is out of bounds.
    pub fn new(buffer: B) -> Self {
        Self {
            buffer,
            geometry: Geometry::default(),
            orientation: Orientation::Rotate0,
            invert: false,
        }
    }

    /// Adopt `geometry`, zero-fill the storage and reset orientation and
    /// invert.
    pub fn configure(&mut self, geometry: Geometry) -> Result<(), Error> {
        let required = geometry.frame_buffer_len();
        let provided = self.buffer.as_ref().len();
        if provided < required {
            return Err(Error::BufferTooSmall { required, provided });
        }
        self.buffer.as_mut().fill(0x00);
        self.geometry = geometry;
        self.orientation = Orientation::Rotate0;
        self.invert = false;
        Ok(())
    }

    /// Current geometry.
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Current orientation.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Rotate subsequent drawing.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    /// Whether black and white are swapped.
    pub fn invert(&self) -> bool {
        self.invert
    }

    /// Swap black and white for subsequent drawing.
    pub fn set_invert(&mut self, invert: bool) {
        self.invert = invert;
    }

    /// Width of the rotated screen.
    pub fn size_x(&self) -> u16 {
        if self.orientation.is_landscape() {
            self.geometry.rows
        } else {
            self.geometry.columns
        }
    }

    /// Height of the rotated screen.
    pub fn size_y(&self) -> u16 {
        if self.orientation.is_landscape() {
            self.geometry.columns
        } else {
            self.geometry.rows
        }
    }

    /// Map a logical coordinate to `(line, position along line)`.
    ///
    /// `None` when the coordinate is outside the rotated screen.
    // Every subtraction is guarded by the bounds check in the same arm.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn orient(&self, x: u16, y: u16) -> Option<(u16, u16)> {
        let v = self.geometry.rows;
        let h = self.geometry.columns;
        match self.orientation {
            Orientation::Rotate0 if x < h && y < v => Some((y, x)),
            Orientation::Rotate90 if x < v && y < h => Some((x, h - 1 - y)),
            Orientation::Rotate180 if x < h && y < v => Some((v - 1 - y, h - 1 - x)),
            Orientation::Rotate270 if x < v && y < h => Some((v - 1 - x, y)),
            _ => None,
        }
    }

    /// Byte offset inside the next page and bit mask for a logical
    /// coordinate.
    pub fn locate(&self, x: u16, y: u16) -> Option<(usize, u8)> {
        self.orient(x, y)
            .map(|(px, py)| self.geometry.locate(px, py))
    }

    /// Draw one pixel into the next page. Out-of-bounds coordinates are
    /// ignored.
    pub fn set_point(&mut self, x: u16, y: u16, colour: Colour) {
        let Some((px, py)) = self.orient(x, y) else {
            return;
        };
        let white = match colour {
            Colour::White => true,
            Colour::Black => false,
            Colour::Grey => (px ^ py) & 1 != 0,
        };
        let (offset, mask) = self.geometry.locate(px, py);
        let set = white ^ self.invert;
        if let Some(byte) = self.buffer.as_mut().get_mut(offset) {
            if set {
                *byte |= mask;
            } else {
                *byte &= !mask;
            }
        }
    }

    /// Read one pixel back from the next page.
    pub fn get_point(&self, x: u16, y: u16) -> Option<Colour> {
        let (offset, mask) = self.locate(x, y)?;
        let byte = self.buffer.as_ref().get(offset)?;
        let white = (byte & mask != 0) ^ self.invert;
        Some(if white { Colour::White } else { Colour::Black })
    }

    /// Fill the next page.
    ///
    /// Grey fills alternating `0x55`/`0xAA` lines regardless of invert.
    pub fn clear(&mut self, colour: Colour) {
        let stride = self.geometry.stride();
        let page_len = self.geometry.page_len();
        let invert = self.invert;
        let Some(next) = self.buffer.as_mut().get_mut(..page_len) else {
            return;
        };
        match colour {
            Colour::Grey => {
                if stride == 0 {
                    return;
                }
                for (line, bytes) in next.chunks_mut(stride).enumerate() {
                    let pattern = if line & 1 == 0 { 0x55 } else { 0xAA };
                    bytes.fill(pattern);
                }
            }
            _ => {
                let fill = if (colour == Colour::White) ^ invert {
                    0xFF
                } else {
                    0x00
                };
                next.fill(fill);
            }
        }
    }

    /// `(next, previous)` pages.
    pub fn pages(&self) -> (&[u8], &[u8]) {
        let page_len = self.geometry.page_len();
        let buffer = self.buffer.as_ref();
        let next = buffer.get(..page_len).unwrap_or_default();
        let previous = buffer
            .get(page_len..self.geometry.frame_buffer_len())
            .unwrap_or_default();
        (next, previous)
    }

    /// Copy the next page over the previous one after a transfer.
    pub fn commit(&mut self) {
        let page_len = self.geometry.page_len();
        let buffer = self.buffer.as_mut();
        if buffer.len() >= self.geometry.frame_buffer_len() {
            buffer.copy_within(..page_len, page_len);
        }
    }

    /// Raw storage.
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_ref()
    }

    /// Give the storage back.
    pub fn release(self) -> B {
        self.buffer
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    // 2.66": 296 lines of 152 pixels, 19 bytes per line
    const GEOMETRY: Geometry = Geometry::new(296, 152);

    fn frame() -> FrameBuffer<Vec<u8>> {
        let mut frame = FrameBuffer::new(vec![0xEE; GEOMETRY.frame_buffer_len()]);
        frame.configure(GEOMETRY).unwrap();
        frame
    }

    #[test]
    fn configure_zero_fills_and_checks_length() {
        let frame = frame();
        assert!(frame.as_bytes().iter().all(|b| *b == 0));

        let mut short = FrameBuffer::new(vec![0u8; 10]);
        assert_eq!(
            short.configure(GEOMETRY),
            Err(Error::BufferTooSmall {
                required: 296 * 19 * 2,
                provided: 10
            })
        );
    }

    #[test]
    fn unconfigured_buffer_rejects_everything() {
        let mut frame = FrameBuffer::new(vec![0u8; 16]);
        frame.set_point(0, 0, Colour::White);
        assert_eq!(frame.get_point(0, 0), None);
        assert!(frame.as_bytes().iter().all(|b| *b == 0));
    }

    #[test]
    fn clear_fills_next_page_only() {
        let mut frame = frame();
        frame.clear(Colour::White);
        let (next, previous) = frame.pages();
        assert!(next.iter().all(|b| *b == 0xFF));
        assert!(previous.iter().all(|b| *b == 0x00));

        frame.clear(Colour::Black);
        assert!(frame.pages().0.iter().all(|b| *b == 0x00));
    }

    #[test]
    fn clear_grey_alternates_by_line() {
        let mut frame = frame();
        frame.clear(Colour::Grey);
        let (next, _) = frame.pages();
        assert!(next[..19].iter().all(|b| *b == 0x55));
        assert!(next[19..38].iter().all(|b| *b == 0xAA));
        assert!(next[38..57].iter().all(|b| *b == 0x55));
    }

    #[test]
    fn invert_swaps_clear_fill() {
        let mut frame = frame();
        frame.set_invert(true);
        frame.clear(Colour::White);
        assert!(frame.pages().0.iter().all(|b| *b == 0x00));
        frame.clear(Colour::Black);
        assert!(frame.pages().0.iter().all(|b| *b == 0xFF));
    }

    #[test]
    fn set_point_addresses_line_and_bit() {
        let mut frame = frame();
        // (x=9, y=3) in orientation 0: line 3, position 9 → byte 3*19 + 1, bit 6
        frame.set_point(9, 3, Colour::White);
        assert_eq!(frame.as_bytes()[3 * 19 + 1], 0b0100_0000);
        assert_eq!(frame.get_point(9, 3), Some(Colour::White));
        frame.set_point(9, 3, Colour::Black);
        assert_eq!(frame.as_bytes()[3 * 19 + 1], 0);
    }

    #[test]
    fn out_of_bounds_is_ignored() {
        let mut frame = frame();
        frame.set_point(152, 0, Colour::White);
        frame.set_point(0, 296, Colour::White);
        assert!(frame.as_bytes().iter().all(|b| *b == 0));
        assert_eq!(frame.get_point(152, 0), None);
    }

    #[test]
    fn orientation_maps_corners() {
        let mut frame = frame();
        assert_eq!(frame.orient(0, 0), Some((0, 0)));

        frame.set_orientation(Orientation::Rotate90);
        assert_eq!((frame.size_x(), frame.size_y()), (296, 152));
        assert_eq!(frame.orient(0, 0), Some((0, 151)));
        assert_eq!(frame.orient(0, 152), None);

        frame.set_orientation(Orientation::Rotate180);
        assert_eq!(frame.orient(0, 0), Some((295, 151)));

        frame.set_orientation(Orientation::Rotate270);
        assert_eq!(frame.orient(0, 0), Some((295, 0)));
        assert_eq!(frame.orient(295, 151), Some((0, 151)));
    }

    #[test]
    fn grey_is_a_checkerboard() {
        let mut frame = frame();
        for x in 0..4 {
            for y in 0..4 {
                frame.set_point(x, y, Colour::Grey);
            }
        }
        assert_eq!(frame.get_point(0, 0), Some(Colour::Black));
        assert_eq!(frame.get_point(1, 0), Some(Colour::White));
        assert_eq!(frame.get_point(0, 1), Some(Colour::White));
        assert_eq!(frame.get_point(1, 1), Some(Colour::Black));
    }

    #[test]
    fn commit_copies_next_over_previous() {
        let mut frame = frame();
        frame.clear(Colour::Grey);
        frame.commit();
        let (next, previous) = frame.pages();
        assert_eq!(next, previous);
    }

    #[test]
    fn split_geometry_uses_page_halves() {
        // 16 lines of 32 pixels: stride 4, page 64, half line 16 pixels
        let geometry = Geometry::new(16, 32).split();
        let mut frame = FrameBuffer::new(vec![0u8; geometry.frame_buffer_len()]);
        frame.configure(geometry).unwrap();

        // upper half: line 2, position 9 → 2 * 2 + 1
        assert_eq!(frame.locate(9, 2), Some((5, 0b0100_0000)));
        // lower half: position 16 + 9 → page / 2 + 2 * 2 + 1
        assert_eq!(frame.locate(25, 2), Some((32 + 5, 0b0100_0000)));
    }

    #[test]
    fn orientation_index_wraps() {
        assert_eq!(Orientation::from_index(5), Orientation::Rotate90);
        assert_eq!(Orientation::from_index(3).index(), 3);
    }
}
