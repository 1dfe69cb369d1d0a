//! # olap-dataframe map / pmap 对比
//!
//! 1. 构造 10,000 行单 Int 列的表，SumRower 分别跑 map 与 pmap
//! 2. 构造 1,000,000 行 "IBF" 表，IncrementRower 分别跑 map 与 pmap
//! 3. filter 与 print 演示
//!
//! 计时由调用方完成，库本身不提供计时设施。

use std::time::Instant;

use olap_dataframe::{
    Column, DataFrame, FnRower, IncrementRower, Row, Schema, SumRower,
};

fn main() -> olap_dataframe::Result<()> {
    println!("═══════════════════════════════════════════════════════════");
    println!("   olap-dataframe map / pmap 演示                           ");
    println!("═══════════════════════════════════════════════════════════\n");

    // =========================================================================
    // 1. SumRower：10,000 行
    // =========================================================================
    println!("【1】SumRower over 10,000 ints ...");
    let mut df = DataFrame::new(&Schema::new());
    df.add_column(Column::from_ints(0..10_000), Some("n"))?;

    let mut sr = SumRower::new();
    let t = Instant::now();
    df.pmap(&mut sr)?;
    println!("    pmap() took {:?}", t.elapsed());
    println!("    expected sum = 49995000, actual = {}", sr.total());

    let mut sr = SumRower::new();
    let t = Instant::now();
    df.map(&mut sr)?;
    println!("    map()  took {:?}", t.elapsed());
    println!("    expected sum = 49995000, actual = {}\n", sr.total());

    // =========================================================================
    // 2. IncrementRower：1,000,000 行 "IBF"
    // =========================================================================
    println!("【2】IncrementRower over 1,000,000 rows of \"IBF\" ...");
    let schema = Schema::parse("IBF")?;
    let mut big = DataFrame::new(&schema);
    let mut row = Row::new(&schema);
    let mut flag = false;
    for i in 0..1_000_000i64 {
        row.set(0, i)?;
        row.set(1, flag)?;
        row.set(2, i as f64)?;
        big.add_row(&row)?;
        flag = !flag;
    }

    let mut ir = IncrementRower::new(&schema);
    let t = Instant::now();
    big.map(&mut ir)?;
    println!("    map()  took {:?}", t.elapsed());

    let mut ipr = IncrementRower::new(&schema);
    let t = Instant::now();
    big.pmap(&mut ipr)?;
    println!("    pmap() took {:?}", t.elapsed());
    println!("    outputs equal: {}\n", ir.output() == ipr.output());

    // =========================================================================
    // 3. filter + print
    // =========================================================================
    println!("【3】filter: n % 2500 == 0 ...");
    let mut every = FnRower(|r: &Row| r.get_int(0).map(|v| v % 2500 == 0).unwrap_or(false));
    let picked = df.filter(&mut every)?;
    println!("    kept {} rows:", picked.nrows());
    picked.print()?;

    println!("═══════════════════════════════════════════════════════════");
    println!("   全部演示完成 ✓");
    println!("═══════════════════════════════════════════════════════════");
    Ok(())
}
