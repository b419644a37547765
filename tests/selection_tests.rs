//! Integration tests for row selection and the tri-state select-all control.
//!
//! Covers single-row toggling, the select-all cycle, the indeterminate
//! invariant (0 < selected < total), stale-id handling, implicit deselection
//! of removed rows, and the selection-count callback.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use tabgrid::column::Column;
use tabgrid::engine::{TableEngine, GLYPH_CHECKED, GLYPH_INDETERMINATE, GLYPH_UNCHECKED};
use tabgrid::state::SelectionSummary;
use tabgrid::value::CellValue;

struct Person {
    id: &'static str,
    name: &'static str,
}

fn people() -> Vec<Person> {
    vec![
        Person { id: "1", name: "John" },
        Person { id: "2", name: "Jane" },
        Person { id: "3", name: "Bob" },
        Person { id: "4", name: "Alice" },
        Person { id: "5", name: "Charlie" },
        Person { id: "6", name: "David" },
        Person { id: "7", name: "Emily" },
        Person { id: "8", name: "Frank" },
        Person { id: "9", name: "Grace" },
        Person { id: "10", name: "Hank" },
    ]
}

fn selectable_engine() -> TableEngine<Person> {
    let columns = vec![
        Column::selection(),
        Column::new("name", "Name", |p: &Person| {
            CellValue::Text(p.name.to_string())
        }),
    ];
    TableEngine::new(columns, |p: &Person| p.id.to_string())
}

#[test]
fn test_toggle_row_flips_membership() {
    let rows = people();
    let mut engine = selectable_engine();

    engine.toggle_row_selected(&rows, "3");
    assert!(engine.store().is_selected("3"));

    engine.toggle_row_selected(&rows, "3");
    assert!(!engine.store().is_selected("3"), "Second toggle must deselect");
}

#[test]
fn test_two_selected_is_indeterminate_with_count_callback() {
    // Scenario: select rows 1 and 2 of 10
    let rows = people();
    let mut engine = selectable_engine();

    let counts: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&counts);
    engine.on_selection_change(move |count| sink.borrow_mut().push(count));

    engine.toggle_row_selected(&rows, "1");
    engine.toggle_row_selected(&rows, "2");
    assert_eq!(*counts.borrow(), vec![1, 2], "Callback fires with the running count");

    let view = engine.derive(&rows);
    assert_eq!(view.selection, SelectionSummary::Indeterminate);
    assert_eq!(view.headers[0].title, GLYPH_INDETERMINATE);
}

#[test]
fn test_select_all_then_deselect_one_is_indeterminate() {
    // Scenario: select all 10, then deselect row 1
    let rows = people();
    let mut engine = selectable_engine();

    engine.toggle_all_selected(&rows);
    assert_eq!(engine.store().selected_count(), 10);

    engine.toggle_row_selected(&rows, "1");
    assert_eq!(engine.store().selected_count(), 9);

    let view = engine.derive(&rows);
    assert_eq!(
        view.selection,
        SelectionSummary::Indeterminate,
        "9 of 10 selected must show indeterminate, not checked"
    );
}

#[test]
fn test_toggle_all_is_idempotent_over_two_calls() {
    let rows = people();
    let mut engine = selectable_engine();
    engine.toggle_row_selected(&rows, "4");
    engine.toggle_row_selected(&rows, "7");
    let before: HashSet<String> = engine.store().selection().clone();
    assert_eq!(before.len(), 2);

    // Indeterminate -> checked -> unchecked: two toggles from a partial
    // selection land on empty, and two more land back on empty
    engine.toggle_all_selected(&rows);
    assert_eq!(engine.store().selected_count(), 10, "First toggle selects all");
    engine.toggle_all_selected(&rows);
    assert_eq!(engine.store().selected_count(), 0, "Second toggle clears");

    engine.toggle_all_selected(&rows);
    engine.toggle_all_selected(&rows);
    assert_eq!(
        engine.store().selected_count(),
        0,
        "toggle_all twice from a settled state returns to that state"
    );
}

#[test]
fn test_tristate_summary_invariant() {
    let rows = people();
    let mut engine = selectable_engine();

    assert_eq!(engine.derive(&rows).selection, SelectionSummary::Unchecked);

    engine.toggle_row_selected(&rows, "1");
    assert_eq!(engine.derive(&rows).selection, SelectionSummary::Indeterminate);

    engine.toggle_all_selected(&rows);
    let view = engine.derive(&rows);
    assert_eq!(view.selection, SelectionSummary::Checked);
    assert_eq!(view.headers[0].title, GLYPH_CHECKED);

    engine.toggle_all_selected(&rows);
    let view = engine.derive(&rows);
    assert_eq!(view.selection, SelectionSummary::Unchecked);
    assert_eq!(view.headers[0].title, GLYPH_UNCHECKED);
}

#[test]
fn test_row_checkbox_cells_follow_selection() {
    let rows = people();
    let mut engine = selectable_engine();
    engine.toggle_row_selected(&rows, "2");

    let view = engine.derive(&rows);
    assert_eq!(view.rows[0].cells[0], GLYPH_UNCHECKED);
    assert_eq!(view.rows[1].cells[0], GLYPH_CHECKED);
    assert!(view.rows[1].selected);
}

#[test]
fn test_stale_id_toggle_is_noop() {
    let rows = people();
    let mut engine = selectable_engine();

    engine.toggle_row_selected(&rows, "99");
    assert_eq!(
        engine.store().selected_count(),
        0,
        "Toggling an id not in the row collection must not select anything"
    );
}

#[test]
fn test_removed_rows_are_deselected_on_derivation() {
    let rows = people();
    let mut engine = selectable_engine();

    let counts: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&counts);
    engine.on_selection_change(move |count| sink.borrow_mut().push(count));

    engine.toggle_row_selected(&rows, "1");
    engine.toggle_row_selected(&rows, "9");

    // Caller replaces the collection; row 9 no longer exists
    let shrunk: Vec<Person> = rows.into_iter().take(5).collect();
    let view = engine.derive(&shrunk);

    assert!(engine.store().is_selected("1"));
    assert!(!engine.store().is_selected("9"), "Removed rows are implicitly deselected");
    assert_eq!(view.selected_count, 1);
    assert_eq!(*counts.borrow(), vec![1, 2, 1], "Pruning also notifies the callback");
}

#[test]
fn test_set_selection_replaces_explicitly() {
    let rows = people();
    let mut engine = selectable_engine();
    engine.toggle_row_selected(&rows, "1");

    engine.set_selection(HashSet::from(["5".to_string(), "6".to_string()]));
    assert!(!engine.store().is_selected("1"));
    assert!(engine.store().is_selected("5"));
    assert_eq!(engine.store().selected_count(), 2);
}

#[test]
fn test_toggle_all_on_empty_collection_is_noop() {
    let rows: Vec<Person> = Vec::new();
    let mut engine = selectable_engine();
    engine.toggle_all_selected(&rows);
    assert_eq!(engine.store().selected_count(), 0);
}

#[test]
fn test_selection_survives_sorting() {
    let rows = people();
    let columns = vec![
        Column::selection(),
        Column::new("name", "Name", |p: &Person| {
            CellValue::Text(p.name.to_string())
        }),
    ];
    let mut engine = TableEngine::new(columns, |p: &Person| p.id.to_string());
    engine.toggle_row_selected(&rows, "10");

    engine.toggle_sort("name");
    let view = engine.derive(&rows);
    let hank = view.rows.iter().find(|r| r.id == "10").unwrap();
    assert!(hank.selected, "Selection is keyed by row id, not by position");
}
