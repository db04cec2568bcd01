use blockreward_economics::{calc_deferred_reward, ForkRegime, StakingEntry, StakingSnapshot};
use blockreward_types::{Address, Header, ProtocolParameters};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn snapshot(nodes: usize) -> StakingSnapshot {
    StakingSnapshot {
        block_num: 0,
        nodes: (0..nodes)
            .map(|i| {
                let mut id = [0u8; 20];
                id[..8].copy_from_slice(&(i as u64).to_be_bytes());
                StakingEntry {
                    node_id: Address(id),
                    reward_addr: Address(id),
                    staking_amount: 5_000_000 + (i as u64 + 1) * 1_000,
                }
            })
            .collect(),
        treasury_a_addr: Address([0xAA; 20]),
        treasury_b_addr: Address([0xBB; 20]),
    }
}

fn bench_deferred_reward(c: &mut Criterion) {
    let params = ProtocolParameters::default();
    let header = Header::new(1, 30_000_000, Address([1u8; 20])).with_base_fee(25_000_000_000u64);

    let mut group = c.benchmark_group("deferred_reward");
    for nodes in [10usize, 50, 200] {
        let snap = snapshot(nodes);
        group.bench_with_input(BenchmarkId::new("kore", nodes), &snap, |b, snap| {
            b.iter(|| {
                calc_deferred_reward(
                    black_box(&header),
                    black_box(&params),
                    ForkRegime::Kore,
                    Some(snap),
                )
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_deferred_reward);
criterion_main!(benches);
