use olap_dataframe::{
    Column, DataFrame, FrameError, IncrementRower, PrintRower, Row, Rower, Schema, SumRower,
};

fn int_frame(n: i64) -> DataFrame {
    let mut df = DataFrame::new(&Schema::new());
    df.add_column(Column::from_ints(0..n), Some("n")).unwrap();
    df
}

#[test]
fn pmap_sum_matches_map_sum() {
    let df = int_frame(10_000);

    let mut seq = SumRower::new();
    df.map(&mut seq).unwrap();
    assert_eq!(seq.total(), 49_995_000);

    let mut par = SumRower::new();
    df.pmap(&mut par).unwrap();
    assert_eq!(par.total(), 49_995_000);
}

#[test]
fn pmap_handles_odd_and_tiny_tables() {
    for n in [0i64, 1, 2, 3, 9_999] {
        let df = int_frame(n);
        let mut par = SumRower::new();
        df.pmap(&mut par).unwrap();
        assert_eq!(par.total(), n * (n - 1).max(0) / 2, "n = {n}");
    }
}

/// 记录自己处理过的行号区间
#[derive(Default)]
struct Ranges {
    seen:   Vec<usize>,
    merged: Vec<Vec<usize>>,
}

impl Rower for Ranges {
    fn accept(&mut self, row: &Row) -> bool {
        self.seen.push(row.get_idx());
        true
    }
    fn clone_worker(&self) -> Self { Self::default() }
    fn join_delete(&mut self, other: Self) {
        self.merged.push(other.seen);
    }
}

#[test]
fn pmap_splits_at_half_with_floor() {
    let df = int_frame(7);
    let mut r = Ranges::default();
    df.pmap(&mut r).unwrap();
    assert_eq!(r.seen, [0, 1, 2]);
    assert_eq!(r.merged, [vec![3usize, 4, 5, 6]]);
}

#[test]
fn pmap_n_folds_workers_in_range_order() {
    let df = int_frame(10);
    let mut r = Ranges::default();
    df.pmap_n(&mut r, 3).unwrap();
    assert_eq!(r.seen, [0, 1, 2]);
    assert_eq!(r.merged, [vec![3usize, 4, 5], vec![6usize, 7, 8, 9]]);
}

#[test]
fn increment_rower_pmap_output_matches_map() {
    let schema = Schema::parse("IBFS").unwrap();
    let mut df = DataFrame::new(&schema);
    let mut row = Row::new(&schema);
    for i in 0..501i64 {
        row.set(0, i).unwrap();
        row.set(1, i % 3 == 0).unwrap();
        row.set(2, i as f64 * 0.25).unwrap();
        row.set(3, format!("r{i}")).unwrap();
        df.add_row(&row).unwrap();
    }

    let mut seq = IncrementRower::new(&schema);
    df.map(&mut seq).unwrap();
    let mut par = IncrementRower::new(&schema);
    df.pmap(&mut par).unwrap();

    let out = par.into_output();
    assert_eq!(&out, seq.output());
    assert_eq!(out.nrows(), 501);
    for i in [0usize, 250, 251, 500] {
        assert_eq!(out.get_int(0, i).unwrap(), i as i64 + 1);
        assert_eq!(out.get_bool(1, i).unwrap(), i % 3 != 0);
        assert_eq!(out.get_float(2, i).unwrap(), i as f64 * 0.25 + 1.0);
        assert_eq!(out.get_string(3, i).unwrap().as_deref(), Some(format!("r{i}").as_str()));
    }
}

#[test]
fn pmap_print_output_keeps_row_order() {
    let df = int_frame(5);
    let mut seq = PrintRower::new();
    df.map(&mut seq).unwrap();
    let mut par = PrintRower::new();
    df.pmap(&mut par).unwrap();
    assert_eq!(seq.output(), "<0>\n<1>\n<2>\n<3>\n<4>\n");
    assert_eq!(par.output(), seq.output());
}

struct Boom;

impl Rower for Boom {
    fn accept(&mut self, row: &Row) -> bool {
        if row.get_idx() == 8 {
            panic!("boom");
        }
        true
    }
    fn clone_worker(&self) -> Self { Boom }
    fn join_delete(&mut self, _other: Self) {}
}

#[test]
fn worker_panic_is_reported_not_propagated() {
    let df = int_frame(10);
    let mut r = Boom;
    assert!(matches!(df.pmap(&mut r), Err(FrameError::WorkerPanicked)));
}
