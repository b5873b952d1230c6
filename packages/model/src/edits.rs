//! Patch builders for edits made inside a single block: table cells,
//! rows and columns, grid images, layout column count.
//!
//! Each builder reads the current block and returns the patch to send
//! through [`crate::mutate::update`], or `None` when the edit does not
//! apply (index out of range, removing the last row or image).

use crate::block::{ColumnLayout, GridImage, ImageGridBlock, LayoutBlock, TableBlock};
use crate::id::BlockId;
use crate::patch::{BlockPatch, ImageGridPatch, LayoutPatch, TablePatch};

impl TableBlock {
    pub fn row_count(&self) -> usize {
        self.table_data.len()
    }

    /// Width of the first row
    pub fn column_count(&self) -> usize {
        self.table_data.first().map_or(0, Vec::len)
    }

    pub fn is_rectangular(&self) -> bool {
        let width = self.column_count();
        self.table_data.iter().all(|row| row.len() == width)
    }

    pub fn set_cell(&self, row: usize, column: usize, value: impl Into<String>) -> Option<BlockPatch> {
        let mut data = self.table_data.clone();
        *data.get_mut(row)?.get_mut(column)? = value.into();
        Some(table_patch(data))
    }

    /// Append a row of empty cells as wide as the first row (at least one)
    pub fn add_row(&self) -> BlockPatch {
        let mut data = self.table_data.clone();
        data.push(vec![String::new(); self.column_count().max(1)]);
        table_patch(data)
    }

    pub fn add_column(&self) -> BlockPatch {
        let mut data = self.table_data.clone();
        for row in &mut data {
            row.push(String::new());
        }
        table_patch(data)
    }

    /// Refused when only one row is left
    pub fn remove_row(&self, row: usize) -> Option<BlockPatch> {
        if self.row_count() <= 1 || row >= self.row_count() {
            return None;
        }
        let mut data = self.table_data.clone();
        data.remove(row);
        Some(table_patch(data))
    }

    /// Refused when only one column is left
    pub fn remove_column(&self, column: usize) -> Option<BlockPatch> {
        if self.column_count() <= 1 || column >= self.column_count() {
            return None;
        }
        let data = self
            .table_data
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|(i, _)| *i != column)
                    .map(|(_, cell)| cell.clone())
                    .collect()
            })
            .collect();
        Some(table_patch(data))
    }
}

fn table_patch(table_data: Vec<Vec<String>>) -> BlockPatch {
    BlockPatch::Table(TablePatch {
        table_data: Some(table_data),
    })
}

impl ImageGridBlock {
    /// Append an empty image slot with a fresh id
    pub fn add_image(&self) -> BlockPatch {
        let mut images = self.images.clone();
        images.push(GridImage::empty());
        images_patch(images)
    }

    /// Refused when it would leave the grid empty
    pub fn remove_image(&self, image_id: &str) -> Option<BlockPatch> {
        if self.images.len() <= 1 {
            return None;
        }
        let images: Vec<GridImage> = self.images.iter().filter(|img| img.id != image_id).cloned().collect();
        (images.len() < self.images.len()).then(|| images_patch(images))
    }

    pub fn set_image_src(&self, image_id: &str, src: Option<String>) -> Option<BlockPatch> {
        self.edit_image(image_id, |img| img.src = src)
    }

    pub fn set_caption(&self, image_id: &str, caption: impl Into<String>) -> Option<BlockPatch> {
        let caption = caption.into();
        self.edit_image(image_id, |img| img.caption = caption)
    }

    pub fn set_grid_columns(&self, columns: u32) -> BlockPatch {
        BlockPatch::ImageGrid(ImageGridPatch {
            images: None,
            grid_columns: Some(columns.max(1)),
        })
    }

    pub fn image(&self, image_id: &str) -> Option<&GridImage> {
        self.images.iter().find(|img| img.id == image_id)
    }

    fn edit_image(&self, image_id: &str, edit: impl FnOnce(&mut GridImage)) -> Option<BlockPatch> {
        let mut images = self.images.clone();
        edit(images.iter_mut().find(|img| img.id == image_id)?);
        Some(images_patch(images))
    }
}

fn images_patch(images: Vec<GridImage>) -> BlockPatch {
    BlockPatch::ImageGrid(ImageGridPatch {
        images: Some(images),
        grid_columns: None,
    })
}

impl LayoutBlock {
    /// Switch column count; retained columns keep their blocks
    pub fn set_layout(&self, layout: ColumnLayout) -> BlockPatch {
        let mut children = self.children.clone();
        children.resize_with(layout.column_count(), Default::default);
        BlockPatch::Layout(LayoutPatch {
            layout: Some(layout),
            children: Some(children),
        })
    }

    /// Ids of the blocks a column change would discard
    pub fn dropped_by(&self, layout: ColumnLayout) -> Vec<BlockId> {
        self.children
            .iter()
            .skip(layout.column_count())
            .flat_map(|column| column.ids())
            .map(BlockId::from)
            .collect()
    }
}
