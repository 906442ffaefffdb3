use std::cell::RefCell;
use std::rc::Rc;

use super::*;

fn capture(reg: &mut MeasurementRegistry) -> Rc<RefCell<Vec<Vec<usize>>>> {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&calls);
    reg.on_complete(move |ms| sink.borrow_mut().push(ms.iter().map(|m| m.index).collect()));
    calls
}

#[test]
fn out_of_order_arrivals_complete_once_sorted() {
    let mut reg = MeasurementRegistry::new(4);
    let calls = capture(&mut reg);

    assert_eq!(reg.report(2, 200.0, 90.0), ReportStatus::Pending);
    assert_eq!(reg.report(0, 0.0, 100.0), ReportStatus::Pending);
    assert_eq!(reg.report(3, 290.0, 80.0), ReportStatus::Pending);
    assert!(calls.borrow().is_empty());
    assert_eq!(reg.report(1, 100.0, 100.0), ReportStatus::Completed);

    assert_eq!(*calls.borrow(), vec![vec![0, 1, 2, 3]]);
    assert!(reg.is_complete());
}

#[test]
fn every_arrival_order_fires_exactly_once() {
    let orders: [[usize; 3]; 6] = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];
    for order in orders {
        let mut reg = MeasurementRegistry::new(3);
        let calls = capture(&mut reg);
        for i in order {
            reg.report(i, i as f64 * 10.0, 10.0);
        }
        // Late duplicates never re-fire.
        reg.report(order[0], 0.0, 12.0);
        assert_eq!(calls.borrow().len(), 1, "order {order:?}");
    }
}

#[test]
fn latest_report_wins() {
    let mut reg = MeasurementRegistry::new(2);
    reg.report(0, 0.0, 50.0);
    reg.report(0, 5.0, 60.0);
    assert_eq!(reg.len(), 1);
    assert_eq!(
        reg.get(0),
        Some(Measurement {
            index: 0,
            offset: 5.0,
            extent: 60.0
        })
    );
}

#[test]
fn updates_after_completion_are_stored_silently() {
    let mut reg = MeasurementRegistry::new(2);
    let calls = capture(&mut reg);
    reg.report(0, 0.0, 10.0);
    reg.report(1, 10.0, 10.0);
    assert_eq!(reg.report(1, 11.0, 12.0), ReportStatus::AlreadyComplete);
    assert_eq!(calls.borrow().len(), 1);
    assert_eq!(reg.get(1).map(|m| m.extent), Some(12.0));
}

#[test]
fn reset_rearms_and_keeps_callback() {
    let mut reg = MeasurementRegistry::new(1);
    let calls = capture(&mut reg);
    reg.report(0, 0.0, 10.0);

    reg.reset(2);
    assert!(!reg.is_complete());
    assert!(reg.is_empty());
    assert_eq!(reg.expected_count(), 2);

    reg.report(1, 10.0, 10.0);
    reg.report(0, 0.0, 10.0);
    assert_eq!(*calls.borrow(), vec![vec![0], vec![0, 1]]);
}

#[test]
fn out_of_range_and_non_finite_reports_are_rejected() {
    let mut reg = MeasurementRegistry::new(2);
    assert_eq!(reg.report(2, 0.0, 10.0), ReportStatus::Rejected);
    assert_eq!(reg.report(0, f64::NAN, 10.0), ReportStatus::Rejected);
    assert_eq!(reg.report(0, 0.0, f64::INFINITY), ReportStatus::Rejected);
    assert!(reg.is_empty());
}

#[test]
fn zero_expected_never_completes() {
    let mut reg = MeasurementRegistry::new(0);
    let calls = capture(&mut reg);
    assert_eq!(reg.report(0, 0.0, 10.0), ReportStatus::Rejected);
    assert!(!reg.is_complete());
    assert!(calls.borrow().is_empty());
}

#[test]
fn completes_without_callback() {
    let mut reg = MeasurementRegistry::new(1);
    assert_eq!(reg.report(0, 1.0, 2.0), ReportStatus::Completed);
    assert_eq!(reg.snapshot().len(), 1);
}
