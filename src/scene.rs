//! In-memory document model the labeling workflow operates on.
//!
//! This is deliberately small: typed named nodes plus the two conversion
//! services the workflow consumes.  Voxel payloads are opaque region ids;
//! nothing here resamples, renders, or otherwise interprets geometry.

use std::collections::BTreeMap;

use volume_fmt::Volume;

#[derive(Debug)]
#[non_exhaustive]
pub enum SceneError {
    NoSuchNode(NodeId),
    WrongNodeKind(NodeId),
    ColorIndexOutOfRange(usize),
}

impl std::error::Error for SceneError {}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::NoSuchNode(id) => {
                write!(f, "NoSuchNode: node {:?} is not in the scene.", id)
            }
            SceneError::WrongNodeKind(id) => write!(
                f,
                "WrongNodeKind: node {:?} is not of the expected kind.",
                id
            ),
            SceneError::ColorIndexOutOfRange(index) => write!(
                f,
                "ColorIndexOutOfRange: index {} is past the end of the color table.",
                index
            ),
        }
    }
}

/// Handle to a scene node.  Ids are never reused within a scene.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct NodeId(u64);

#[derive(Debug)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub data: NodeData,
}

#[derive(Debug)]
pub enum NodeData {
    ScalarVolume(Volume),
    LabelMapVolume(LabelMap),
    ColorTable(ColorTable),
    Segmentation(Segmentation),
}

#[derive(Debug)]
pub struct LabelMap {
    pub volume: Volume,

    /// Color table assigned to this label map's display, if any.
    pub display_color_table: Option<NodeId>,
}

/// Dense indexed color table: region id -> (label, color).
///
/// The table has a fixed size set up front; assigning past the end is an
/// error rather than a silent grow.
#[derive(Debug, Default)]
pub struct ColorTable {
    colors: Vec<Option<(String, [u8; 4])>>,
}

impl ColorTable {
    pub fn set_number_of_colors(&mut self, count: usize) {
        self.colors.resize(count, None);
    }

    pub fn number_of_colors(&self) -> usize {
        self.colors.len()
    }

    pub fn set_color(
        &mut self,
        index: usize,
        label: &str,
        rgba: [u8; 4],
    ) -> Result<(), SceneError> {
        match self.colors.get_mut(index) {
            Some(slot) => {
                *slot = Some((label.into(), rgba));
                Ok(())
            }
            None => Err(SceneError::ColorIndexOutOfRange(index)),
        }
    }

    /// The entry at `index`, or `None` if it is unset or out of range.
    pub fn color(&self, index: usize) -> Option<&(String, [u8; 4])> {
        self.colors.get(index).and_then(|slot| slot.as_ref())
    }
}

/// One labeled region of a segmentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub region_id: i32,
    pub label: String,
    pub rgba: [u8; 4],
    pub voxel_count: usize,
}

#[derive(Debug, Default)]
pub struct Segmentation {
    pub segments: Vec<Segment>,
}

#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<Node>,
    next_id: u64,
}

impl Scene {
    pub fn new() -> Scene {
        Scene {
            nodes: Vec::new(),
            next_id: 0,
        }
    }

    pub fn add_scalar_volume(&mut self, name: &str, volume: Volume) -> NodeId {
        self.add_node(name, NodeData::ScalarVolume(volume))
    }

    pub fn add_label_map(&mut self, name: &str, volume: Volume) -> NodeId {
        self.add_node(
            name,
            NodeData::LabelMapVolume(LabelMap {
                volume,
                display_color_table: None,
            }),
        )
    }

    pub fn add_color_table(&mut self, name: &str) -> NodeId {
        self.add_node(name, NodeData::ColorTable(ColorTable::default()))
    }

    pub fn add_segmentation(&mut self, name: &str) -> NodeId {
        self.add_node(name, NodeData::Segmentation(Segmentation::default()))
    }

    fn add_node(&mut self, name: &str, data: NodeData) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.push(Node {
            id,
            name: name.into(),
            data,
        });
        id
    }

    pub fn remove_node(&mut self, id: NodeId) -> Result<(), SceneError> {
        match self.nodes.iter().position(|n| n.id == id) {
            Some(index) => {
                self.nodes.remove(index);
                Ok(())
            }
            None => Err(SceneError::NoSuchNode(id)),
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn scalar_volume(&self, id: NodeId) -> Result<&Volume, SceneError> {
        match &self.get(id)?.data {
            NodeData::ScalarVolume(volume) => Ok(volume),
            _ => Err(SceneError::WrongNodeKind(id)),
        }
    }

    pub fn label_map(&self, id: NodeId) -> Result<&LabelMap, SceneError> {
        match &self.get(id)?.data {
            NodeData::LabelMapVolume(label_map) => Ok(label_map),
            _ => Err(SceneError::WrongNodeKind(id)),
        }
    }

    pub fn label_map_mut(&mut self, id: NodeId) -> Result<&mut LabelMap, SceneError> {
        match &mut self.get_mut(id)?.data {
            NodeData::LabelMapVolume(label_map) => Ok(label_map),
            _ => Err(SceneError::WrongNodeKind(id)),
        }
    }

    pub fn color_table(&self, id: NodeId) -> Result<&ColorTable, SceneError> {
        match &self.get(id)?.data {
            NodeData::ColorTable(table) => Ok(table),
            _ => Err(SceneError::WrongNodeKind(id)),
        }
    }

    pub fn color_table_mut(&mut self, id: NodeId) -> Result<&mut ColorTable, SceneError> {
        match &mut self.get_mut(id)?.data {
            NodeData::ColorTable(table) => Ok(table),
            _ => Err(SceneError::WrongNodeKind(id)),
        }
    }

    pub fn segmentation(&self, id: NodeId) -> Result<&Segmentation, SceneError> {
        match &self.get(id)?.data {
            NodeData::Segmentation(segmentation) => Ok(segmentation),
            _ => Err(SceneError::WrongNodeKind(id)),
        }
    }

    pub fn segmentation_mut(&mut self, id: NodeId) -> Result<&mut Segmentation, SceneError> {
        match &mut self.get_mut(id)?.data {
            NodeData::Segmentation(segmentation) => Ok(segmentation),
            _ => Err(SceneError::WrongNodeKind(id)),
        }
    }

    fn get(&self, id: NodeId) -> Result<&Node, SceneError> {
        self.node(id).ok_or(SceneError::NoSuchNode(id))
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut Node, SceneError> {
        self.nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(SceneError::NoSuchNode(id))
    }
}

/// Clones the voxels of a scalar volume into a new label map node.
pub fn create_label_volume_from_volume(
    scene: &mut Scene,
    name: &str,
    source: NodeId,
) -> Result<NodeId, SceneError> {
    let volume = scene.scalar_volume(source)?.clone();
    Ok(scene.add_label_map(name, volume))
}

/// Builds the segmentation's segments from the label map's voxels: one
/// segment per distinct nonzero region id, in ascending id order, named
/// and colored from the label map's display color table.
///
/// Region id 0 is background and produces no segment.  Ids the table does
/// not cover fall back to a generated name and opaque gray.
pub fn import_labelmap_to_segmentation(
    scene: &mut Scene,
    label_map: NodeId,
    segmentation: NodeId,
) -> Result<(), SceneError> {
    let (counts, table_id) = {
        let label_map = scene.label_map(label_map)?;
        let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
        for &voxel in &label_map.volume.voxels {
            if voxel != 0 {
                *counts.entry(voxel).or_insert(0) += 1;
            }
        }
        (counts, label_map.display_color_table)
    };

    let mut segments = Vec::with_capacity(counts.len());
    {
        let table = match table_id {
            Some(id) => Some(scene.color_table(id)?),
            None => None,
        };
        for (region_id, voxel_count) in counts {
            let entry = if region_id >= 0 {
                table.and_then(|t| t.color(region_id as usize))
            } else {
                None
            };
            let (label, rgba) = match entry {
                Some((label, rgba)) => (label.clone(), *rgba),
                None => (format!("region {}", region_id), [128, 128, 128, 255]),
            };
            segments.push(Segment {
                region_id,
                label,
                rgba,
                voxel_count,
            });
        }
    }

    scene.segmentation_mut(segmentation)?.segments = segments;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volume(voxels: Vec<i32>) -> Volume {
        Volume {
            dimensions: [voxels.len(), 1, 1],
            voxels,
        }
    }

    #[test]
    fn node_ids_are_not_reused() {
        let mut scene = Scene::new();
        let a = scene.add_segmentation("a");
        scene.remove_node(a).unwrap();
        let b = scene.add_segmentation("b");

        assert_ne!(a, b);
        assert!(scene.node(a).is_none());
        assert!(scene.node(b).is_some());
    }

    #[test]
    fn typed_accessors_reject_other_kinds() {
        let mut scene = Scene::new();
        let id = scene.add_segmentation("seg");

        assert!(matches!(
            scene.scalar_volume(id),
            Err(SceneError::WrongNodeKind(_))
        ));
        assert!(scene.segmentation(id).is_ok());
    }

    #[test]
    fn removing_a_missing_node_fails() {
        let mut scene = Scene::new();
        let id = scene.add_color_table("t");
        scene.remove_node(id).unwrap();

        assert!(matches!(
            scene.remove_node(id),
            Err(SceneError::NoSuchNode(_))
        ));
    }

    #[test]
    fn color_table_assignment() {
        let mut table = ColorTable::default();
        table.set_number_of_colors(4);
        assert_eq!(table.number_of_colors(), 4);

        table.set_color(2, "cortex", [25, 100, 40, 255]).unwrap();
        assert_eq!(table.color(2), Some(&("cortex".into(), [25, 100, 40, 255])));
        assert_eq!(table.color(1), None);
        assert_eq!(table.color(9), None);

        assert!(matches!(
            table.set_color(4, "x", [0, 0, 0, 0]),
            Err(SceneError::ColorIndexOutOfRange(4))
        ));
    }

    #[test]
    fn label_volume_creation_clones_the_voxels() {
        let mut scene = Scene::new();
        let source = scene.add_scalar_volume("parc", volume(vec![1, 2, 2]));

        let label = create_label_volume_from_volume(&mut scene, "labels", source).unwrap();

        assert_eq!(scene.label_map(label).unwrap().volume.voxels, vec![1, 2, 2]);
        // The source stays in the scene; the caller decides its fate.
        assert!(scene.scalar_volume(source).is_ok());
    }

    #[test]
    fn import_builds_one_segment_per_region() {
        let mut scene = Scene::new();
        let label = scene.add_label_map("labels", volume(vec![0, 2, 2, 5, 2, 0]));
        let table = scene.add_color_table("colors");
        {
            let t = scene.color_table_mut(table).unwrap();
            t.set_number_of_colors(6);
            t.set_color(2, "white-matter", [245, 245, 245, 255]).unwrap();
            t.set_color(5, "ventricle", [120, 18, 134, 255]).unwrap();
        }
        scene.label_map_mut(label).unwrap().display_color_table = Some(table);
        let seg = scene.add_segmentation("seg");

        import_labelmap_to_segmentation(&mut scene, label, seg).unwrap();

        let segments = &scene.segmentation(seg).unwrap().segments;
        assert_eq!(
            *segments,
            vec![
                Segment {
                    region_id: 2,
                    label: "white-matter".into(),
                    rgba: [245, 245, 245, 255],
                    voxel_count: 3,
                },
                Segment {
                    region_id: 5,
                    label: "ventricle".into(),
                    rgba: [120, 18, 134, 255],
                    voxel_count: 1,
                },
            ]
        );
    }

    #[test]
    fn import_falls_back_for_uncovered_ids() {
        let mut scene = Scene::new();
        let label = scene.add_label_map("labels", volume(vec![7, -3]));
        let seg = scene.add_segmentation("seg");

        import_labelmap_to_segmentation(&mut scene, label, seg).unwrap();

        let segments = &scene.segmentation(seg).unwrap().segments;
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].region_id, -3);
        assert_eq!(segments[0].label, "region -3");
        assert_eq!(segments[1].label, "region 7");
        assert_eq!(segments[1].rgba, [128, 128, 128, 255]);
    }

    #[test]
    fn import_of_all_background_yields_no_segments() {
        let mut scene = Scene::new();
        let label = scene.add_label_map("labels", volume(vec![0, 0, 0]));
        let seg = scene.add_segmentation("seg");

        import_labelmap_to_segmentation(&mut scene, label, seg).unwrap();

        assert!(scene.segmentation(seg).unwrap().segments.is_empty());
    }
}
