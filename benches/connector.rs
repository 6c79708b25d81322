use criterion::{black_box, criterion_group, criterion_main, Criterion};

use mzconnect::connector::{MatchScorer, SimpleConnector};
use mzconnect::peaks::{ConnectedMzPeak, ConnectedPeak};
use mzconnect::{CentroidPeak, DataFileRef, Run, Scan, ScanRef, SimpleConnectorParameters, Tolerance};

/// A run with `n_traces` persistent m/z traces that rise and fall over `n_scans` scans
fn synthetic_run(n_scans: usize, n_traces: usize) -> Run {
    let scans = (0..n_scans)
        .map(|i| {
            let time = i as f64 * 0.05;
            let peaks = (0..n_traces)
                .map(|j| {
                    let mz = 200.0 + j as f64 * 0.731;
                    let phase = (i + j * 7) as f64 / 25.0;
                    let intensity = 1000.0 * (1.0 + phase.sin()) as f32 + 1.0;
                    CentroidPeak::new(mz + (i % 3) as f64 * 1e-4, intensity, j as u32)
                })
                .collect();
            Scan::new(ScanRef::new(i, time), peaks)
        })
        .collect();
    Run::new(DataFileRef::new("synthetic"), scans)
}

fn connect_run(params: SimpleConnectorParameters, run: &Run) -> Vec<ConnectedPeak> {
    let mut connector = SimpleConnector::new(params).unwrap();
    let mut peaks = Vec::new();
    for scan in run.scans.iter() {
        peaks.extend(connector.add_scan(scan.scan, &scan.peaks, &run.data_file));
    }
    peaks.extend(connector.finish_peaks());
    peaks
}

fn connector(c: &mut Criterion) {
    let run = synthetic_run(500, 300);
    let params = SimpleConnectorParameters::new(Tolerance::PPM(10.0), 0.5, 0.1, 10.0);
    c.bench_function("simple_connector", |b| {
        b.iter(|| connect_run(black_box(params), black_box(&run)))
    });
    let params = params.with_chromatographic_threshold(0.3);
    c.bench_function("simple_connector_threshold", |b| {
        b.iter(|| connect_run(black_box(params), black_box(&run)))
    });
}

fn scoring(c: &mut Criterion) {
    let run = synthetic_run(2, 2000);
    let pool: Vec<ConnectedPeak> = run.scans[0]
        .peaks
        .iter()
        .map(|p| ConnectedPeak::new(run.data_file.clone(), ConnectedMzPeak::new(run.scans[0].scan, p.clone())))
        .collect();
    let candidates: Vec<ConnectedMzPeak> = run.scans[1]
        .peaks
        .iter()
        .map(|p| ConnectedMzPeak::new(run.scans[1].scan, p.clone()))
        .collect();
    let scorer = MatchScorer::new(Tolerance::PPM(10.0), 0.5);
    c.bench_function("score_all", |b| {
        b.iter(|| scorer.score_all(black_box(&pool), black_box(&candidates)))
    });
}

criterion_group!(benches, connector, scoring);
criterion_main!(benches);
