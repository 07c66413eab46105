//! The sheet: grid storage, cycle detection, dependency wiring, cache
//! invalidation, and printable-area tracking.

use std::collections::HashMap;
use std::collections::HashSet;
use std::io;

use cellgrid_engine::{Cell, Position, Size};

use crate::error::{Result, SheetError};

/// An in-memory spreadsheet: a sparse grid of [`Cell`]s addressed by
/// [`Position`], plus the bookkeeping needed to keep formula caches coherent
/// and the printable area minimal.
#[derive(Clone, Debug, Default)]
pub struct Sheet {
    storage: HashMap<Position, Cell>,
    sheet_size: Size,
    print_size: Size,
}

impl Sheet {
    pub fn new() -> Sheet {
        Sheet::default()
    }

    fn invalid(pos: Position) -> SheetError {
        SheetError::InvalidPosition {
            row: pos.row as i64,
            col: pos.col as i64,
        }
    }

    /// Resolve the value at `pos` for use as a formula's cell-reference
    /// lookup. Only ever called with positions the parser has already
    /// validated; an absent position reads as `0.0` the same way an
    /// explicit `Cell::Empty` does.
    fn resolve(&self, pos: Position) -> cellgrid_engine::Value {
        match self.storage.get(&pos) {
            Some(cell) => cell.value(&mut |p| self.resolve(p)),
            None => cellgrid_engine::Value::Number(0.0),
        }
    }

    /// Whether installing a cell at `subject` that references `scratch_refs`
    /// would introduce a cycle. DFS over `referenced_cells()` with a
    /// `visiting` set so diamond-shaped dependency graphs aren't revisited.
    fn would_cycle(&self, subject: Position, scratch_refs: &[Position]) -> bool {
        let mut visited = HashSet::new();
        let mut stack: Vec<Position> = scratch_refs.to_vec();
        while let Some(p) = stack.pop() {
            if p == subject {
                return true;
            }
            if !visited.insert(p) {
                continue;
            }
            if let Some(cell) = self.storage.get(&p) {
                stack.extend(cell.referenced_cells());
            }
        }
        false
    }

    /// Clear the memoized value of `pos` and everything transitively
    /// dependent on it, following `dependents` edges.
    fn invalidate_transitively(&mut self, pos: Position) {
        let mut visited = HashSet::new();
        let mut stack = vec![pos];
        while let Some(p) = stack.pop() {
            if !visited.insert(p) {
                continue;
            }
            if let Some(cell) = self.storage.get(&p) {
                cell.clear_cache();
                stack.extend(cell.dependents.iter().copied());
            }
        }
    }

    /// Recompute `print_size` as the minimal bounding box over every
    /// non-empty cell. Used after `clear_cell`, where a monotone update
    /// could leave the area larger than necessary.
    fn recompute_print_size(&mut self) {
        let mut size = Size::default();
        for (pos, cell) in &self.storage {
            if !cell.is_empty() {
                size.grow_to_contain(*pos);
            }
        }
        self.print_size = size;
    }

    /// Set the content at `pos` from its textual form. Parser failures,
    /// cycle introductions, and invalid positions all leave the sheet
    /// unchanged (scratch-then-install).
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<()> {
        if !pos.is_valid() {
            return Err(Self::invalid(pos));
        }
        self.sheet_size.grow_to_contain(pos);

        if let Some(existing) = self.storage.get(&pos) {
            if existing.text() == text {
                return Ok(());
            }
        }

        let mut scratch =
            Cell::set(text).map_err(|e| SheetError::FormulaException(e.to_string()))?;

        let refs = scratch.referenced_cells();
        if self.would_cycle(pos, &refs) {
            return Err(SheetError::CircularDependency);
        }

        // Incoming edges (who depends on `pos`) belong to the position, not
        // to whichever formula happens to live there; carry them across the
        // replacement instead of starting a fresh, empty list.
        let old_dependents = self
            .storage
            .get(&pos)
            .map(|c| c.dependents.clone())
            .unwrap_or_default();
        scratch.dependents = old_dependents;
        let is_empty = scratch.is_empty();
        self.storage.insert(pos, scratch);

        for r in &refs {
            if r.is_valid() {
                self.storage.entry(*r).or_insert_with(Cell::new_empty);
                self.sheet_size.grow_to_contain(*r);
                if let Some(cell) = self.storage.get_mut(r) {
                    cell.dependents.push(pos);
                }
            }
        }

        self.invalidate_transitively(pos);

        if !is_empty {
            self.print_size.grow_to_contain(pos);
        }

        Ok(())
    }

    /// Look up the cell at `pos`. Absent storage and an explicit `Empty`
    /// cell both read as `None`: this engine doesn't distinguish "never
    /// set" from "set to the empty string".
    pub fn get_cell(&self, pos: Position) -> Result<Option<&Cell>> {
        if !pos.is_valid() {
            return Err(Self::invalid(pos));
        }
        match self.storage.get(&pos) {
            Some(cell) if !cell.is_empty() => Ok(Some(cell)),
            _ => Ok(None),
        }
    }

    /// Evaluate the cell at `pos` to a display-ready [`cellgrid_engine::Value`].
    /// A no-op position reads as `Value::Number(0.0)`, matching `get_cell`
    /// folding "never set" into "empty".
    pub fn value_at(&self, pos: Position) -> Result<cellgrid_engine::Value> {
        if !pos.is_valid() {
            return Err(Self::invalid(pos));
        }
        Ok(self.resolve(pos))
    }

    /// Reset the cell at `pos` to `Empty`. Its incoming `dependents` list is
    /// preserved (those cells still need their caches cleared); other
    /// cells' `dependents` lists referencing `pos` are left untouched.
    pub fn clear_cell(&mut self, pos: Position) -> Result<()> {
        if !pos.is_valid() {
            return Err(Self::invalid(pos));
        }
        if let Some(cell) = self.storage.get_mut(&pos) {
            let dependents = std::mem::take(&mut cell.dependents);
            let mut empty = Cell::new_empty();
            empty.dependents = dependents;
            *cell = empty;

            self.invalidate_transitively(pos);
            self.recompute_print_size();
        }
        Ok(())
    }

    /// The tightest rectangle from `(0, 0)` containing every non-empty cell.
    pub fn printable_size(&self) -> Size {
        self.print_size
    }

    /// The allocated rectangle (grows monotonically, never shrinks).
    pub fn sheet_size(&self) -> Size {
        self.sheet_size
    }

    fn print_with<W, F>(&self, mut w: W, field: F) -> io::Result<()>
    where
        W: io::Write,
        F: Fn(&Cell) -> String,
    {
        for row in 0..self.print_size.rows {
            for col in 0..self.print_size.cols {
                if col > 0 {
                    write!(w, "\t")?;
                }
                if let Some(cell) = self.storage.get(&Position::new(row, col)) {
                    if !cell.is_empty() {
                        write!(w, "{}", field(cell))?;
                    }
                }
            }
            writeln!(w)?;
        }
        Ok(())
    }

    /// Write every cell's evaluated value, tab-separated within a row,
    /// newline-terminated per row.
    pub fn print_values<W: io::Write>(&self, w: W) -> io::Result<()> {
        self.print_with(w, |cell| {
            cell.value(&mut |p| self.resolve(p)).display_string()
        })
    }

    /// Write every cell's raw text, tab-separated within a row,
    /// newline-terminated per row.
    pub fn print_texts<W: io::Write>(&self, w: W) -> io::Result<()> {
        self.print_with(w, |cell| cell.text())
    }
}
