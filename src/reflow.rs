// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The resize/reflow algorithm: reshapes reflowable on-screen logical lines to a
//! new width, pulling back enough recently-committed history to refill a grown
//! viewport, while leaving fixed-width (alt-screen/TUI) lines untouched.
//!
//! This is coordinated at this top-level module rather than inside
//! [`crate::viewport::ViewportState`] because it needs both the viewport (for the
//! currently on-screen chains) and the history (for the pull-back tail) at once.

use crate::{
    cell::Cell,
    error::EngineResult,
    history::ScrollbackHistory,
    logical_line::trim_trailing_blank,
    row::{RowMetadata, RowState},
    viewport::ViewportState,
};

struct StreamLine {
    cells: Vec<Cell>,
    fixed_width: Option<u16>,
    from_history: bool,
    logical_line_id: i64,
    already_committed: bool,
    /// Set only on the single chain that contains the cursor, so the post-rewrap
    /// cursor position can be recovered.
    cursor_offset: Option<usize>,
}

/// Resizes `viewport` from its current dimensions to `new_w`×`new_h`, rewrapping
/// reflowable content and leaving fixed-width lines clipped/padded in place.
/// Alt-screen content is never reflowed — it goes through the plain
/// cell-preserving [`ViewportState::resize`] instead.
pub async fn reflow(
    viewport: &mut ViewportState,
    history: &ScrollbackHistory,
    new_w: u16,
    new_h: u16,
) -> EngineResult<()> {
    // A resize to zero rows or columns is meaningless; keep the current layout.
    if new_w == 0 || new_h == 0 {
        return Ok(());
    }

    if viewport.alt_screen {
        viewport.resize(new_w, new_h);
        return Ok(());
    }

    let (cursor_chain_idx, cursor_offset) = viewport.cursor_chain_position();
    let chains = viewport.extract_chains();

    // Pull back enough already-committed history to refill a grown viewport. Bounded at
    // `new_h` lines: more than that could never be visible after rewrap anyway.
    let total_history = history.total_len();
    let pull_back = u64::from(new_h).min(total_history);
    let tail_start = total_history - pull_back;
    let history_tail = history.range(tail_start..total_history).await?;

    let mut stream: Vec<StreamLine> = Vec::with_capacity(history_tail.len() + chains.len());
    for (i, line) in history_tail.into_iter().enumerate() {
        stream.push(StreamLine {
            cells: line.cells,
            fixed_width: line.fixed_width,
            from_history: true,
            logical_line_id: (tail_start + i as u64) as i64,
            already_committed: true,
            cursor_offset: None,
        });
    }
    for (i, chain) in chains.into_iter().enumerate() {
        let mut cells = chain.cells;
        // The cursor's own chain keeps its trailing blanks — the cursor may be parked
        // past the last printed character — everything else gets trimmed.
        if i != cursor_chain_idx {
            trim_trailing_blank(&mut cells);
        }
        stream.push(StreamLine {
            cells,
            fixed_width: None,
            from_history: chain.already_committed,
            logical_line_id: chain.logical_line_id,
            already_committed: chain.already_committed,
            cursor_offset: if i == cursor_chain_idx { Some(cursor_offset) } else { None },
        });
    }

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    let mut metadata: Vec<RowMetadata> = Vec::new();
    let mut new_cursor: Option<(u16, u16)> = None;

    for line in stream {
        let row_start = rows.len();
        if line.fixed_width.is_some() {
            let mut cells = line.cells;
            cells.resize(new_w as usize, Cell::blank());
            rows.push(cells);
            metadata.push(committed_meta(line.from_history, line.logical_line_id));
        } else {
            let wrapped_rows = rewrap(&line.cells, new_w);
            for (i, row) in wrapped_rows.into_iter().enumerate() {
                rows.push(row);
                let mut meta = if line.already_committed {
                    committed_meta(line.from_history, line.logical_line_id)
                } else {
                    RowMetadata {
                        logical_line_id: line.logical_line_id,
                        is_first_row: false,
                        is_continuation: false,
                        state: RowState::Dirty,
                        from_history: false,
                    }
                };
                meta.is_first_row = i == 0;
                meta.is_continuation = i != 0;
                metadata.push(meta);
            }
        }

        if let Some(offset) = line.cursor_offset {
            let row_in_chain = offset / new_w as usize;
            let col = offset % new_w as usize;
            new_cursor = Some(((col as u16).min(new_w - 1), (row_start + row_in_chain) as u16));
        }
    }

    // Repopulate from the bottom: keep the last `new_h` rows, padding blank rows at the
    // top if the stream is shorter than the viewport.
    let keep_from = rows.len().saturating_sub(new_h as usize);
    rows.drain(..keep_from);
    metadata.drain(..keep_from);
    let pad_count = new_h as usize - rows.len();
    for _ in 0..pad_count {
        rows.insert(0, vec![Cell::blank(); new_w as usize]);
        metadata.insert(0, RowMetadata::fresh());
    }

    let (cx, cy) = new_cursor.unwrap_or((0, new_h - 1));
    let shifted = i64::from(cy) - keep_from as i64 + pad_count as i64;
    let final_y = shifted.clamp(0, i64::from(new_h) - 1) as u16;

    viewport.install_reflowed_rows(new_w, rows, metadata);
    viewport.set_cursor(cx, final_y);
    Ok(())
}

fn committed_meta(from_history: bool, logical_line_id: i64) -> RowMetadata {
    RowMetadata {
        logical_line_id,
        is_first_row: false,
        is_continuation: false,
        state: RowState::Committed,
        from_history,
    }
}

/// Rewraps one logical line's cells to `width` columns, cell by cell, marking every
/// non-final row's last cell `wrapped = true`. A wide cell that would straddle the
/// boundary gets a padding blank inserted before it instead of being split.
fn rewrap(cells: &[Cell], width: u16) -> Vec<Vec<Cell>> {
    let width = width as usize;
    if cells.is_empty() {
        return vec![vec![Cell::blank(); width]];
    }

    let mut rows = Vec::new();
    let mut current: Vec<Cell> = Vec::with_capacity(width);
    for &cell in cells {
        let is_leading_wide = cell.wide && !cell.is_empty();
        if is_leading_wide && current.len() + 1 == width {
            current.push(Cell::blank());
            finish_row(&mut rows, &mut current, width);
        }
        current.push(cell);
        if current.len() == width {
            finish_row(&mut rows, &mut current, width);
        }
    }
    if !current.is_empty() {
        current.resize(width, Cell::blank());
        rows.push(current);
    }
    if rows.is_empty() {
        rows.push(vec![Cell::blank(); width]);
    }
    rows
}

fn finish_row(rows: &mut Vec<Vec<Cell>>, current: &mut Vec<Cell>, width: u16) {
    if let Some(last) = current.last_mut() {
        last.wrapped = true;
    }
    let mut row = std::mem::replace(current, Vec::with_capacity(width as usize));
    row.resize(width as usize, Cell::blank());
    rows.push(row);
}
