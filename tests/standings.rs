//! Standings order and export.

mod common;

use common::{id, participant};
use swiss_tournament::{sort_standings, standings_table, write_standings_csv};

#[test]
fn orders_by_points_then_tiebreaks() {
    let mut a = participant(1, 1.0, &[]);
    a.tiebreak1 = 0.5;
    let mut b = participant(2, 2.0, &[]);
    b.tiebreak1 = 0.0;
    let mut c = participant(3, 1.0, &[]);
    c.tiebreak1 = 1.5;
    let mut d = participant(4, 1.0, &[]);
    d.tiebreak1 = 1.5;
    d.tiebreak2 = 2.0;

    let order: Vec<_> = sort_standings(&[a, b, c, d]).iter().map(|p| p.id).collect();
    assert_eq!(order, vec![id(2), id(4), id(3), id(1)]);
}

#[test]
fn dropped_sort_last_regardless_of_score() {
    let mut leader = participant(1, 5.0, &[]);
    leader.dropped = true;
    let trailing = participant(2, 0.0, &[]);

    let order: Vec<_> = sort_standings(&[leader, trailing]).iter().map(|p| p.id).collect();
    assert_eq!(order, vec![id(2), id(1)]);
}

#[test]
fn full_ties_keep_input_order() {
    let players: Vec<_> = (1..=6).map(|n| participant(n, 1.0, &[])).collect();
    let first = sort_standings(&players);
    let second = sort_standings(&players);

    let order: Vec<_> = first.iter().map(|p| p.id).collect();
    assert_eq!(order, (1..=6).map(id).collect::<Vec<_>>());
    assert_eq!(first, second);
}

#[test]
fn table_ranks_from_one_and_exports_csv() {
    let players = vec![participant(1, 0.0, &[]), participant(2, 1.0, &[])];
    let rows = standings_table(&players);
    assert_eq!(rows[0].rank, 1);
    assert_eq!(rows[0].name, "P2");
    assert_eq!(rows[1].rank, 2);

    let mut buf = Vec::new();
    write_standings_csv(&rows, &mut buf).unwrap();
    let csv = String::from_utf8(buf).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("rank,id,name,points,tiebreak1,tiebreak2,dropped")
    );
    assert!(lines.next().unwrap().starts_with("1,"));
    assert_eq!(csv.lines().count(), 3);
}
