//! Slide-index edits on raw markdown. Every operation re-splits the deck,
//! edits the segment list and joins it again, so slide indices stay aligned
//! with [`split_slides`].

use serde::{Deserialize, Serialize};

use crate::parser::{join_slides, split_slides};

/// Segment inserted by [`add_slide`].
pub const NEW_SLIDE_TEMPLATE: &str = "\n\n# New Slide\n\n- Content";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

pub fn slide_count(markdown: &str) -> usize {
    split_slides(markdown).len()
}

/// Inserts `content` as a new segment before index `insert_at`, clamped to the
/// end of the deck.
pub fn insert_slide(markdown: &str, insert_at: usize, content: &str) -> String {
    let mut segments = split_slides(markdown);
    let at = insert_at.min(segments.len());
    segments.insert(at, content);
    join_slides(&segments)
}

pub fn add_slide(markdown: &str, insert_at: usize) -> String {
    insert_slide(markdown, insert_at, NEW_SLIDE_TEMPLATE)
}

/// Removes the listed slides. Indices past the end are ignored.
pub fn delete_slides(markdown: &str, indices: &[usize]) -> String {
    let segments: Vec<&str> = split_slides(markdown)
        .into_iter()
        .enumerate()
        .filter(|(index, _)| !indices.contains(index))
        .map(|(_, segment)| segment)
        .collect();
    join_slides(&segments)
}

/// Moves every listed slide one step in `direction` and returns the new
/// markdown with the moved indices.
///
/// When the selection is empty, names a slide past the end, or touches the
/// boundary in `direction`, the input comes back unchanged together with the
/// sorted selection.
pub fn move_slides(
    markdown: &str,
    indices: &[usize],
    direction: MoveDirection,
) -> (String, Vec<usize>) {
    let sorted = sorted_unique(indices);
    match shift_slides(markdown, &sorted, direction) {
        Some(moved) => moved,
        None => (markdown.to_string(), sorted),
    }
}

fn sorted_unique(indices: &[usize]) -> Vec<usize> {
    let mut sorted = indices.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted
}

/// `None` when the move is blocked. `sorted` must be sorted and deduplicated.
fn shift_slides(
    markdown: &str,
    sorted: &[usize],
    direction: MoveDirection,
) -> Option<(String, Vec<usize>)> {
    let mut segments = split_slides(markdown);
    let len = segments.len();
    let (&first, &last) = (sorted.first()?, sorted.last()?);
    let blocked = last >= len
        || match direction {
            MoveDirection::Up => first == 0,
            MoveDirection::Down => last + 1 == len,
        };
    if blocked {
        return None;
    }

    let moved = match direction {
        MoveDirection::Up => {
            for &index in sorted {
                segments.swap(index - 1, index);
            }
            sorted.iter().map(|i| i - 1).collect()
        }
        MoveDirection::Down => {
            for &index in sorted.iter().rev() {
                segments.swap(index, index + 1);
            }
            sorted.iter().map(|i| i + 1).collect()
        }
    };
    Some((join_slides(&segments), moved))
}

/// Index shown after `current` in presentation mode.
pub fn next_slide(current: usize, count: usize) -> usize {
    (current + 1).min(count.saturating_sub(1))
}

pub fn previous_slide(current: usize) -> usize {
    current.saturating_sub(1)
}

/// Slides picked in the deck grid, in the order they were picked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    indices: Vec<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(index: usize) -> Self {
        Self {
            indices: vec![index],
        }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    /// Plain click: select only `index`.
    pub fn select(&mut self, index: usize) {
        self.indices.clear();
        self.indices.push(index);
    }

    /// Modifier click: add or remove `index`.
    pub fn toggle(&mut self, index: usize) {
        if let Some(pos) = self.indices.iter().position(|&i| i == index) {
            self.indices.remove(pos);
        } else {
            self.indices.push(index);
        }
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }

    /// Where a new slide goes: after the last selected slide, else at the end.
    pub fn insertion_index(&self, slide_count: usize) -> usize {
        self.indices
            .iter()
            .max()
            .map_or(slide_count, |&max| max + 1)
    }

    /// First slide shown when a presentation starts.
    pub fn presentation_start(&self) -> usize {
        self.indices.first().copied().unwrap_or(0)
    }

    /// Adds a template slide after the selection and selects it.
    pub fn add_slide(&mut self, markdown: &str) -> String {
        let at = self
            .insertion_index(slide_count(markdown))
            .min(slide_count(markdown));
        self.select(at);
        add_slide(markdown, at)
    }

    /// Deletes the selected slides and clears the selection.
    pub fn delete(&mut self, markdown: &str) -> String {
        if self.is_empty() {
            return markdown.to_string();
        }
        let out = delete_slides(markdown, &self.indices);
        self.clear();
        out
    }

    pub fn move_selected(&mut self, markdown: &str, direction: MoveDirection) -> String {
        if self.is_empty() {
            return markdown.to_string();
        }
        let sorted = sorted_unique(&self.indices);
        match shift_slides(markdown, &sorted, direction) {
            Some((out, moved)) => {
                self.indices = moved;
                out
            }
            None => markdown.to_string(),
        }
    }
}
