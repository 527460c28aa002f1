//! The parcellation-to-segmentation workflow.

use lut_fmt::LutEntry;

use crate::scene::{self, NodeId, Scene, SceneError};

/// Turns the scalar volume at `source` into a segmentation: one segment
/// per region id present in the volume, named and colored from `lut`.
///
/// On success the source volume and the intermediate label map are
/// removed from the scene and the new segmentation's id is returned; the
/// color table stays behind as a reusable artifact.  On failure every
/// node this call created is removed again.
pub fn label_parcellation(
    scene: &mut Scene,
    source: NodeId,
    lut: &[LutEntry],
) -> Result<NodeId, SceneError> {
    let source_name = scene
        .node(source)
        .ok_or(SceneError::NoSuchNode(source))?
        .name
        .clone();

    let label_node = scene::create_label_volume_from_volume(scene, "aparc+seg", source)?;
    let table_node = scene.add_color_table(&format!("{} colors", source_name));
    let seg_node = scene.add_segmentation(&format!("{} segmentation", source_name));

    if let Err(e) = fill_and_import(scene, lut, label_node, table_node, seg_node) {
        let _ = scene.remove_node(seg_node);
        let _ = scene.remove_node(table_node);
        let _ = scene.remove_node(label_node);
        return Err(e);
    }

    scene.remove_node(source)?;
    scene.remove_node(label_node)?;

    Ok(seg_node)
}

fn fill_and_import(
    scene: &mut Scene,
    lut: &[LutEntry],
    label_node: NodeId,
    table_node: NodeId,
    seg_node: NodeId,
) -> Result<(), SceneError> {
    {
        let table = scene.color_table_mut(table_node)?;

        // Size the table to the largest id; later duplicates overwrite
        // earlier ones.
        let capacity = lut.iter().map(|e| e.id as usize + 1).max().unwrap_or(0);
        table.set_number_of_colors(capacity);
        for entry in lut {
            table.set_color(entry.id as usize, &entry.label, entry.rgba)?;
        }
    }

    scene.label_map_mut(label_node)?.display_color_table = Some(table_node);

    scene::import_labelmap_to_segmentation(scene, label_node, seg_node)
}
