use image::{imageops, RgbaImage};
use serde::Serialize;

use super::Sprite;
use crate::palette::Palette;

/// Position of a sprite in a packed sprite sheet
#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize)]
pub struct SheetPosition {
    /// grid row
    pub row: u32,
    /// grid column
    pub col: u32,
}

/// Grid position of the `i`-th sprite (discovery order) in a sheet with `cols` columns
#[must_use]
pub const fn sheet_position(i: u32, cols: u32) -> SheetPosition {
    let cols = if cols == 0 { 1 } else { cols };
    SheetPosition {
        row: i / cols,
        col: i % cols,
    }
}

/// Number of grid rows needed for `count` sprites in `cols` columns
#[must_use]
pub const fn sheet_rows(count: u32, cols: u32) -> u32 {
    let cols = if cols == 0 { 1 } else { cols };
    count.div_ceil(cols)
}

/// Packs `sprites` left-to-right, top-to-bottom into one image of `cols` cells per row
///
/// Every sprite is drawn in its own cell of `cell_width` x `cell_height` pixels. The sheet
/// is never wider than `sprites.len()` cells.
#[must_use]
pub fn compose_sheet(
    sprites: &[Sprite],
    palette: &Palette,
    cols: u32,
    (cell_width, cell_height): (u16, u16),
) -> RgbaImage {
    let (cell_width, cell_height) = (u32::from(cell_width), u32::from(cell_height));
    let count = u32::try_from(sprites.len()).unwrap_or(u32::MAX);
    let cols = cols.clamp(1, count.max(1));
    let mut sheet = RgbaImage::new(cols * cell_width, sheet_rows(count, cols) * cell_height);
    for (i, sprite) in (0..count).zip(sprites) {
        let SheetPosition { row, col } = sheet_position(i, cols);
        imageops::replace(
            &mut sheet,
            &sprite.to_image(palette),
            i64::from(col * cell_width),
            i64::from(row * cell_height),
        );
    }
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packing_is_row_major() {
        assert_eq!(sheet_position(0, 8), SheetPosition { row: 0, col: 0 });
        assert_eq!(sheet_position(7, 8), SheetPosition { row: 0, col: 7 });
        assert_eq!(sheet_position(8, 8), SheetPosition { row: 1, col: 0 });
        assert_eq!(sheet_position(16, 8), SheetPosition { row: 2, col: 0 });
        assert_eq!(sheet_rows(17, 8), 3);
        assert_eq!(sheet_rows(16, 8), 2);
        assert_eq!(sheet_rows(0, 8), 0);
    }

    #[test]
    fn sheet_is_no_wider_than_its_sprites() {
        use crate::{palette::Color, sprite::decompress::DecodedSprite};

        let palette = Palette::from_colors(vec![Color::new(1, 2, 3); 256]).unwrap();
        let decoded = DecodedSprite {
            pixels: vec![1],
            bytes_consumed: 2,
        };
        let sprites = [Sprite::new(0, 0, decoded, 32, 40)];
        let sheet = compose_sheet(&sprites, &palette, u32::MAX / 16, (32, 40));
        assert_eq!(sheet.dimensions(), (32, 40));
        assert_eq!(sheet.get_pixel(0, 0).0, [1, 2, 3, 255]);

        let empty = compose_sheet(&[], &palette, u32::MAX, (32, 40));
        assert_eq!(empty.dimensions(), (32, 0));
    }
}
