use salvo::{BitBoard, BitBoardError};

#[test]
fn test_try_new_sizes() {
    assert!(BitBoard::<u64>::try_new(10).is_ok());
    assert!(matches!(BitBoard::<u64>::try_new(0), Err(BitBoardError::ZeroSize)));
}

#[test]
fn test_get_set_clear() {
    let mut bb = BitBoard::<u16>::new(4);
    assert!(bb.is_empty());

    bb.set(1, 1).unwrap();
    assert!(bb.get(1, 1).unwrap());

    bb.clear(1, 1).unwrap();
    assert!(!bb.get(1, 1).unwrap());

    bb.set(2, 3).unwrap();
    assert!(bb.contains(2, 3));
    assert_eq!(bb.count_ones(), 1);
}

#[test]
fn test_out_of_bounds() {
    let mut bb = BitBoard::<u64>::new(3);
    assert_eq!(
        bb.set(3, 0).unwrap_err(),
        BitBoardError::IndexOutOfBounds { row: 3, col: 0 }
    );
    assert!(!bb.contains(0, 3));
}

#[test]
fn test_from_iter_and_iter() {
    let bb = BitBoard::<u16>::from_iter(4, [(0, 1), (3, 3)]).unwrap();
    let bits: Vec<_> = bb.iter_set_bits().collect();
    assert_eq!(bits, vec![(0, 1), (3, 3)]);
}

#[test]
fn test_spans_multiple_words() {
    // 10x10 in u8 words needs 13 of them
    let mut bb = BitBoard::<u8>::new(10);
    bb.set(9, 9).unwrap();
    bb.set(0, 0).unwrap();
    assert_eq!(bb.iter_set_bits().collect::<Vec<_>>(), vec![(0, 0), (9, 9)]);
}

#[test]
fn test_not_stays_on_board() {
    let mut bb = BitBoard::<u64>::new(10);
    bb.set(4, 4).unwrap();
    let inverted = !&bb;
    assert_eq!(inverted.count_ones(), 99);
    assert!(!inverted.contains(4, 4));
}

#[test]
fn test_and_or() {
    let a = BitBoard::<u32>::from_iter(5, [(0, 0), (1, 1)]).unwrap();
    let b = BitBoard::<u32>::from_iter(5, [(1, 1), (2, 2)]).unwrap();
    assert_eq!((&a & &b).iter_set_bits().collect::<Vec<_>>(), vec![(1, 1)]);
    assert_eq!((&a | &b).count_ones(), 3);
}
