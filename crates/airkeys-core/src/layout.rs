use crate::consts::{
    DELETE_KEY_WIDTH, DELETE_LABEL, GRID_START_X, GRID_START_Y, KEY_HEIGHT, KEY_MARGIN_X,
    KEY_MARGIN_Y, KEY_WIDTH,
};
use crate::geometry::KeyRegion;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// The QWERTY grid the remote detector maps presses against.
pub const DEFAULT_ROWS: [&[&str]; 3] = [
    &["Q", "W", "E", "R", "T", "Y", "U", "I", "O", "P"],
    &["A", "S", "D", "F", "G", "H", "J", "K", "L", ";"],
    &["Z", "X", "C", "V", "B", "N", "M", ",", ".", "/", DELETE_LABEL],
];

pub fn rows_from(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(|s| s.to_string()).collect())
        .collect()
}

fn default_rows() -> Vec<Vec<String>> {
    rows_from(&DEFAULT_ROWS)
}

/// Static description of the key grid.
///
/// Row `i`, column `j` lands at
/// `(start_x + j * (key_width + margin_x), start_y + i * (key_height + margin_y))`.
/// Every key is `key_width` wide except the delete key.
#[derive(Debug, Clone, PartialEq, TypedBuilder, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSpec {
    #[builder(default = default_rows())]
    pub rows: Vec<Vec<String>>,
    #[builder(default = DELETE_LABEL.to_string(), setter(into))]
    pub delete_label: String,
    #[builder(default = KEY_WIDTH)]
    pub key_width: f32,
    #[builder(default = KEY_HEIGHT)]
    pub key_height: f32,
    #[builder(default = DELETE_KEY_WIDTH)]
    pub delete_width: f32,
    #[builder(default = KEY_MARGIN_X)]
    pub margin_x: f32,
    #[builder(default = KEY_MARGIN_Y)]
    pub margin_y: f32,
    #[builder(default = GRID_START_X)]
    pub start_x: f32,
    #[builder(default = GRID_START_Y)]
    pub start_y: f32,
}

impl Default for LayoutSpec {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Flat list of key regions. Generated once, read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyboardLayout {
    regions: Vec<KeyRegion>,
    delete_label: String,
}

impl KeyboardLayout {
    pub fn generate(spec: &LayoutSpec) -> Self {
        let pitch_x = spec.key_width + spec.margin_x;
        let pitch_y = spec.key_height + spec.margin_y;

        let mut regions = Vec::new();
        for (i, row) in spec.rows.iter().enumerate() {
            for (j, label) in row.iter().enumerate() {
                let w = if *label == spec.delete_label {
                    spec.delete_width
                } else {
                    spec.key_width
                };
                regions.push(KeyRegion::new(
                    label.clone(),
                    spec.start_x + j as f32 * pitch_x,
                    spec.start_y + i as f32 * pitch_y,
                    w,
                    spec.key_height,
                ));
            }
        }

        Self {
            regions,
            delete_label: spec.delete_label.clone(),
        }
    }

    pub fn regions(&self) -> &[KeyRegion] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn delete_label(&self) -> &str {
        &self.delete_label
    }

    pub fn find(&self, label: &str) -> Option<&KeyRegion> {
        self.regions.iter().find(|r| r.label == label)
    }

    /// Key whose interior contains the point.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<&KeyRegion> {
        self.regions.iter().find(|r| r.contains(x, y))
    }

    /// First pair of distinct-label regions sharing interior area, if any.
    ///
    /// The default grid has none; a custom grid with the wide delete key
    /// placed mid-row does.
    pub fn first_overlap(&self) -> Option<(&KeyRegion, &KeyRegion)> {
        for (i, a) in self.regions.iter().enumerate() {
            for b in &self.regions[i + 1..] {
                if a.label != b.label && a.overlaps(b) {
                    return Some((a, b));
                }
            }
        }
        None
    }

    /// Right and bottom edge of the whole keyboard.
    pub fn extent(&self) -> (f32, f32) {
        self.regions.iter().fold((0.0f32, 0.0f32), |(w, h), r| {
            (w.max(r.x + r.w), h.max(r.y + r.h))
        })
    }
}

impl Default for KeyboardLayout {
    fn default() -> Self {
        Self::generate(&LayoutSpec::default())
    }
}
