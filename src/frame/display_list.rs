//! Display-list dumps attached to painted layers.
//!
//! The dump is indented text, one display item per line. Items live in a flat arena and refer to
//! each other by index; `parent` links are derived data, skipped by serde and rebuilt with
//! [`DisplayList::relink`].

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// Index of an item inside its [`DisplayList`] arena.
pub type DisplayItemId = usize;

/// Arena index of the synthetic root item.
pub const ROOT_ID: DisplayItemId = 0;

static ITEM_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)(\w+)\sp=(\w+)\sf=(.*?)\s(z=(\w+)\s)?(.*?)?( layer=(\w+))?$")
        .expect("display item pattern is valid")
});

static MATRIX_2X3: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r".*\[ (.*?) (.*?); (.*?) (.*?); (.*?) (.*?); \].*$")
        .expect("matrix pattern is valid")
});

static HIT_REGION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r".*\(hitRegion < \(x=(\w+), y=(\w+), w=(\w+), h=(\w+)\); >\).*$")
        .expect("hit region pattern is valid")
});

// Bookkeeping items that carry no pixels of their own.
const INVISIBLE_ITEMS: [&str; 2] = ["nsDisplayTransform", "LayerEventRegions"];

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Value of a parenthesised `name(value)` group on an item line.
pub enum FieldValue {
    /// Four comma-separated numbers, e.g. `bounds(0,0,100,50)`.
    Rect([f64; 4]),
    /// Anything else, verbatim.
    Text(String),
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DisplayItem {
    pub name: String,
    /// Source line as dumped.
    pub line: String,
    pub address: String,
    pub frame: Option<String>,
    pub z: Option<String>,
    /// Address of the layer the item was painted into (absent for wrap lists).
    pub layer: Option<String>,
    pub fields: BTreeMap<String, FieldValue>,
    pub children: Vec<DisplayItemId>,
    #[serde(skip)]
    pub parent: Option<DisplayItemId>,
    /// Traversal index assigned by [`DisplayList::reindex`].
    #[serde(default)]
    pub index: usize,
}

impl DisplayItem {
    fn new(name: &str, line: &str, address: &str) -> Self {
        Self {
            name: name.to_string(),
            line: line.to_string(),
            address: address.to_string(),
            frame: None,
            z: None,
            layer: None,
            fields: BTreeMap::new(),
            children: Vec::new(),
            parent: None,
            index: 0,
        }
    }

    pub fn rect_field(&self, name: &str) -> Option<[f64; 4]> {
        match self.fields.get(name) {
            Some(FieldValue::Rect(r)) => Some(*r),
            _ => None,
        }
    }

    pub fn is_visual(&self) -> bool {
        !INVISIBLE_ITEMS.contains(&self.name.as_str())
    }

    /// The `[ a b; c d; e f; ]` matrix printed by transform items, as three rows.
    pub fn matrix_2x3(&self) -> Option<[[f64; 2]; 3]> {
        let caps = MATRIX_2X3.captures(&self.line)?;
        let mut v = [0.0f64; 6];
        for (i, slot) in v.iter_mut().enumerate() {
            *slot = caps.get(i + 1)?.as_str().trim().parse().ok()?;
        }
        Some([[v[0], v[1]], [v[2], v[3]], [v[4], v[5]]])
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DisplayList {
    /// Address of the content layer, from the first line of the dump.
    pub content_layer: String,
    /// Arena; index [`ROOT_ID`] is the synthetic `DisplayListRoot`.
    pub items: Vec<DisplayItem>,
}

impl DisplayList {
    /// Parse a display-list dump. Lines that do not look like an item are logged and skipped.
    pub fn parse(log: &str) -> Self {
        let mut lines = log.lines();
        let content_layer = lines.next().unwrap_or_default().trim().to_string();

        let mut items = vec![DisplayItem::new(
            "DisplayListRoot",
            "DisplayListRoot p",
            "0x0",
        )];
        // Last item seen at each indentation level. Deeper entries are not cleared when the
        // indentation drops back.
        let mut at_level: Vec<Option<DisplayItemId>> = Vec::new();

        for line in lines {
            let Some(caps) = ITEM_LINE.captures(line) else {
                tracing::debug!(line, "display list line did not match");
                continue;
            };
            let indent = caps.get(1).map_or(0, |m| m.as_str().len()) / 2;
            let name = caps.get(2).map_or("", |m| m.as_str());
            let address = caps.get(3).map_or("", |m| m.as_str());

            let mut item = DisplayItem::new(name, line, address);
            item.frame = caps.get(4).map(|m| m.as_str().to_string());
            item.z = caps.get(6).map(|m| m.as_str().to_string());
            item.layer = caps.get(9).map(|m| m.as_str().to_string());
            let rest = caps.get(7).map_or("", |m| m.as_str());
            // A group directly after the frame is the content node name, which has no prefix.
            item.fields = if rest.starts_with('(') {
                parse_fields(&format!("content{rest}"))
            } else {
                parse_fields(rest)
            };

            let id = items.len();
            let parent = if indent == 0 {
                Some(ROOT_ID)
            } else {
                at_level.get(indent - 1).copied().flatten()
            };
            if let Some(p) = parent {
                item.parent = Some(p);
                items[p].children.push(id);
            } else {
                tracing::debug!(line, indent, "display item has no parent at this depth");
            }
            items.push(item);

            if at_level.len() <= indent {
                at_level.resize(indent + 1, None);
            }
            at_level[indent] = Some(id);
        }

        let mut list = Self {
            content_layer,
            items,
        };
        list.reindex();
        list
    }

    /// The synthetic root; `None` only for a list read from a damaged archive.
    pub fn root(&self) -> Option<&DisplayItem> {
        self.items.get(ROOT_ID)
    }

    pub fn get(&self, id: DisplayItemId) -> Option<&DisplayItem> {
        self.items.get(id)
    }

    /// Restore `parent` on every item from the `children` lists.
    pub fn relink(&mut self) {
        for item in &mut self.items {
            item.parent = None;
        }
        for id in 0..self.items.len() {
            let children = self.items[id].children.clone();
            for child in children {
                if let Some(c) = self.items.get_mut(child) {
                    c.parent = Some(id);
                }
            }
        }
    }

    /// Number the tree: root is 0, every child is numbered after its own subtree.
    pub fn reindex(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.items[ROOT_ID].index = 0;
        let mut next = 1usize;
        let mut seen = vec![false; self.items.len()];
        seen[ROOT_ID] = true;
        // (item, position of the next child to visit)
        let mut stack = vec![(ROOT_ID, 0usize)];
        while let Some((id, pos)) = stack.pop() {
            match self.items[id].children.get(pos).copied() {
                Some(child) => {
                    stack.push((id, pos + 1));
                    if child < self.items.len() && !seen[child] {
                        seen[child] = true;
                        stack.push((child, 0));
                    }
                }
                None if id != ROOT_ID => {
                    self.items[id].index = next;
                    next += 1;
                }
                None => {}
            }
        }
    }

    pub fn find_by_index(&self, index: usize) -> Option<DisplayItemId> {
        self.subtree(ROOT_ID)
            .into_iter()
            .find(|&id| self.items[id].index == index)
    }

    /// Number of descendants below `id`.
    pub fn children_count(&self, id: DisplayItemId) -> usize {
        self.subtree(id).len().saturating_sub(1)
    }

    // Preorder ids of `id` and its descendants. Each item is visited once, so a hand-edited
    // archive with shared or cyclic children still terminates.
    fn subtree(&self, id: DisplayItemId) -> Vec<DisplayItemId> {
        let mut out = Vec::new();
        if id >= self.items.len() {
            return out;
        }
        let mut seen = vec![false; self.items.len()];
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if seen[cur] {
                continue;
            }
            seen[cur] = true;
            out.push(cur);
            stack.extend(
                self.items[cur]
                    .children
                    .iter()
                    .rev()
                    .copied()
                    .filter(|&c| c < self.items.len()),
            );
        }
        out
    }

    /// Hit-test region of an item, shifted by its transform ancestors.
    pub fn hit_region(&self, id: DisplayItemId) -> Option<[f64; 4]> {
        let item = self.items.get(id)?;
        let caps = HIT_REGION.captures(&item.line)?;
        let mut region = [0.0f64; 4];
        for (i, slot) in region.iter_mut().enumerate() {
            *slot = caps.get(i + 1)?.as_str().parse().ok()?;
        }
        Some(self.apply_transform(id, region))
    }

    /// `layerBounds` of an item in units of `unit` (app units per pixel), shifted by its
    /// transform ancestors.
    pub fn boundary(&self, id: DisplayItemId, unit: f64) -> Option<[f64; 4]> {
        let bounds = self.items.get(id)?.rect_field("layerBounds")?;
        Some(self.apply_transform(id, bounds.map(|v| v / unit)))
    }

    fn apply_transform(&self, id: DisplayItemId, mut region: [f64; 4]) -> [f64; 4] {
        let mut cursor = self.items.get(id).and_then(|i| i.parent);
        // A parent chain never has more links than there are items.
        let mut hops = self.items.len();
        while let Some(pid) = cursor {
            if hops == 0 {
                break;
            }
            hops -= 1;
            let Some(parent) = self.items.get(pid) else {
                break;
            };
            if parent.name == "nsDisplayTransform"
                && let Some(t) = parent.rect_field("layerBounds")
            {
                region[0] += t[0];
                region[1] += t[1];
            }
            cursor = parent.parent;
        }
        region
    }
}

/// Split `name(value)` groups at nesting depth zero. Unbalanced `)` are ignored.
fn parse_fields(rest: &str) -> BTreeMap<String, FieldValue> {
    let mut fields = BTreeMap::new();
    let mut nesting = 0usize;
    let mut start = 0usize;
    let mut name_start = 0usize;

    for (j, ch) in rest.char_indices() {
        match ch {
            '(' => {
                nesting += 1;
                if nesting == 1 {
                    start = j;
                }
            }
            ')' => {
                if nesting == 0 {
                    continue;
                }
                nesting -= 1;
                if nesting == 0 && name_start <= start {
                    let name = &rest[name_start..start];
                    let value = &rest[start + 1..j];
                    fields.insert(name.to_string(), field_value(value));
                }
            }
            ' ' if nesting == 0 => name_start = j + 1,
            _ => {}
        }
    }
    fields
}

fn field_value(value: &str) -> FieldValue {
    let parts: Vec<&str> = value.split(',').collect();
    if parts.len() == 4 {
        let nums: Vec<f64> = parts
            .iter()
            .filter_map(|p| p.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .collect();
        if let [a, b, c, d] = nums[..] {
            return FieldValue::Rect([a, b, c, d]);
        }
    }
    FieldValue::Text(value.to_string())
}

#[cfg(test)]
#[path = "../../tests/unit/frame/display_list.rs"]
mod tests;
