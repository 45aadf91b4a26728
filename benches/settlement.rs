use criterion::{black_box, criterion_group, criterion_main, Criterion};
use split_ledger::core::services::{ExpenseService, GroupService};
use split_ledger::domain::{document::LedgerDocument, expense::ExpenseDraft, group::Group};
use split_ledger::ledger::{compute_balances, compute_settlement, simplify_debts};
use split_ledger::storage::json_backend::{load_document_from_path, save_document_to_path};
use tempfile::tempdir;

fn build_sample_group(member_count: usize, expense_count: usize) -> (LedgerDocument, Group) {
    let members: Vec<String> = (0..member_count).map(|idx| format!("member-{idx}")).collect();
    let mut document = LedgerDocument::default();
    let id = GroupService::create(&mut document, "Benchmark", &members).expect("group");

    for idx in 0..expense_count {
        let payer = members[idx % member_count].clone();
        let mut draft = ExpenseDraft::equal(format!("Expense {idx}"), 10.0 + (idx % 97) as f64, payer);
        if idx % 4 == 0 {
            draft = draft.excluding([members[(idx + 1) % member_count].clone()]);
        }
        ExpenseService::add(&mut document, id, draft).expect("expense");
    }

    let group = document.group(id).expect("group").clone();
    (document, group)
}

fn bench_settlement(c: &mut Criterion) {
    let (_, group) = build_sample_group(50, 5_000);

    c.bench_function("balances_50x5k", |b| {
        b.iter(|| black_box(compute_balances(black_box(&group))))
    });

    let balances = compute_balances(&group);
    c.bench_function("simplify_50", |b| {
        b.iter(|| black_box(simplify_debts(black_box(&balances))))
    });

    c.bench_function("settlement_50x5k", |b| {
        b.iter(|| black_box(compute_settlement(black_box(&group))))
    });
}

fn bench_document_io(c: &mut Criterion) {
    let (document, _) = build_sample_group(20, 10_000);
    let dir = tempdir().expect("tempdir");
    let file_path = dir.path().join("ledger.json");

    c.bench_function("document_save_10k", |b| {
        b.iter(|| save_document_to_path(&document, &file_path).expect("save"))
    });

    save_document_to_path(&document, &file_path).expect("seed");
    c.bench_function("document_load_10k", |b| {
        b.iter(|| black_box(load_document_from_path(&file_path).expect("load")))
    });
}

criterion_group!(benches, bench_settlement, bench_document_io);
criterion_main!(benches);
