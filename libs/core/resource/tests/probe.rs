// [libs/core/resource/tests/probe.rs]
use aegis_core_resource::ResourceProbe;

#[test]
fn snapshot_without_gpu_source_reports_empty_gpu_list() {
    let probe = ResourceProbe::without_gpu(std::env::temp_dir());
    let snapshot = probe.snapshot();
    assert!(snapshot.gpus.is_empty());
}

#[test]
fn snapshot_mem_pct_is_between_zero_and_hundred_on_linux_hosts() {
    let probe = ResourceProbe::without_gpu(std::env::temp_dir());
    let snapshot = probe.snapshot();
    let pct = snapshot.mem_pct();
    assert!((0.0..=100.0).contains(&pct), "mem_pct out of range: {pct}");
}

#[test]
fn disk_free_reports_nonzero_for_a_real_mounted_path() {
    let free = aegis_core_resource::disk::read_disk_free_bytes(&std::env::temp_dir());
    assert!(free.is_none() || free.unwrap() > 0);
}
