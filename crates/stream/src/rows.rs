use glam::Vec3;
use skyline_assets::PlacedContent;

/// One Z-slice of a loaded world.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Row origin relative to the world origin.
    pub position: Vec3,
    pub contents: Vec<PlacedContent>,
}

impl Row {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            contents: Vec::new(),
        }
    }
}

/// A row moved from the near end of the world to the far end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recycled {
    pub row: usize,
    pub from: Vec3,
    pub to: Vec3,
}

/// Fixed-capacity arena of rows, filled once while loading and then
/// recycled round-robin.
#[derive(Debug, Clone, Default)]
pub struct RowBuffer {
    rows: Vec<Row>,
    capacity: usize,
    recycle_index: usize,
}

impl RowBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
            capacity,
            recycle_index: 0,
        }
    }

    /// Open a new row at `position`. Returns its index, or `None` once the
    /// buffer holds `capacity` rows.
    pub fn push_row(&mut self, position: Vec3) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        self.rows.push(Row::new(position));
        Some(self.rows.len() - 1)
    }

    /// The row most recently opened.
    pub fn current_mut(&mut self) -> Option<&mut Row> {
        self.rows.last_mut()
    }

    pub fn is_full(&self) -> bool {
        self.rows.len() >= self.capacity
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn recycle_index(&self) -> usize {
        self.recycle_index
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn content_count(&self) -> usize {
        self.rows.iter().map(|r| r.contents.len()).sum()
    }

    /// Move the row at the recycle index by `delta_z` and step the index.
    /// Only a full buffer recycles.
    pub fn recycle_next(&mut self, delta_z: f32) -> Option<Recycled> {
        if self.capacity == 0 || !self.is_full() {
            return None;
        }
        let index = self.recycle_index;
        let row = self.rows.get_mut(index)?;
        let from = row.position;
        row.position.z += delta_z;
        self.recycle_index = (index + 1) % self.capacity;
        Some(Recycled {
            row: index,
            from,
            to: row.position,
        })
    }

    /// Drop every row. Returns how many were released.
    pub fn release(&mut self) -> usize {
        let released = self.rows.len();
        self.rows.clear();
        self.rows.shrink_to_fit();
        self.recycle_index = 0;
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_buffer(n: usize) -> RowBuffer {
        let mut buf = RowBuffer::with_capacity(n);
        for i in 0..n {
            buf.push_row(Vec3::new(0.0, 0.0, -(i as f32) * 5.0));
        }
        buf
    }

    #[test]
    fn push_stops_at_capacity() {
        let mut buf = RowBuffer::with_capacity(2);
        assert_eq!(buf.push_row(Vec3::ZERO), Some(0));
        assert_eq!(buf.push_row(Vec3::ZERO), Some(1));
        assert_eq!(buf.push_row(Vec3::ZERO), None);
        assert!(buf.is_full());
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn partial_buffer_does_not_recycle() {
        let mut buf = RowBuffer::with_capacity(3);
        buf.push_row(Vec3::ZERO);
        assert_eq!(buf.recycle_next(-15.0), None);
        assert_eq!(RowBuffer::with_capacity(0).recycle_next(-15.0), None);
    }

    #[test]
    fn recycles_round_robin() {
        let mut buf = full_buffer(3);
        let order: Vec<usize> = (0..7)
            .map(|_| buf.recycle_next(-15.0).map(|r| r.row).unwrap())
            .collect();
        assert_eq!(order, vec![0, 1, 2, 0, 1, 2, 0]);
        assert_eq!(buf.recycle_index(), 1);
    }

    #[test]
    fn recycle_moves_only_z() {
        let mut buf = RowBuffer::with_capacity(2);
        buf.push_row(Vec3::new(0.01, 0.0, -5.0));
        buf.push_row(Vec3::new(0.02, 0.0, 0.0));
        let moved = buf.recycle_next(-10.0).unwrap();
        assert_eq!(moved.from, Vec3::new(0.01, 0.0, -5.0));
        assert_eq!(moved.to, Vec3::new(0.01, 0.0, -15.0));
        assert_eq!(buf.get(0).unwrap().position, moved.to);
    }

    #[test]
    fn release_empties_buffer() {
        let mut buf = full_buffer(4);
        buf.recycle_next(-20.0);
        assert_eq!(buf.release(), 4);
        assert!(buf.is_empty());
        assert_eq!(buf.recycle_index(), 0);
        assert_eq!(buf.content_count(), 0);
    }
}
