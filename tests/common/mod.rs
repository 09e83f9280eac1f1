use general_scan::ScanOps;

/// Left-to-right fold of `prepare` over `data`, projected by `gen`.
pub fn sequential_reduction<O: ScanOps>(ops: &O, data: &[O::Elem]) -> O::Output {
    let tally = data
        .iter()
        .fold(ops.identity(), |acc, x| ops.combine(&acc, &ops.prepare(x)));
    ops.gen(&tally)
}

/// Inclusive prefix fold, one result per element.
pub fn sequential_scan<O: ScanOps>(ops: &O, data: &[O::Elem]) -> Vec<O::Output> {
    let mut acc = ops.identity();
    data.iter()
        .map(|x| {
            acc = ops.combine(&acc, &ops.prepare(x));
            ops.gen(&acc)
        })
        .collect()
}
