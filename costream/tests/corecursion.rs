use costream::prelude::*;
use costream::tests_utils::{compare, prefix};

/// `x` labels counting down to zero in front of `s`: `helper(3, s)` is `0, 1, 2, s...`.
fn helper(x: i32, s: impl Into<Link<i32>>) -> Stream<i32> {
    if x == 0 {
        Stream::prepend(0, 0, s)
    } else {
        helper(x - 1, cons(x - 1, s))
    }
}

#[test]
fn fibonacci() {
    let fib: Stream<i64> = Stream::fix(|s| cons(0, s + cons(1, s)));
    compare(&fib, &[0, 1, 1, 2, 3, 5, 8, 13, 21, 34], 1);
}

#[test]
fn periodic() {
    let s: Stream<i32> = Stream::fix(|s| cons(0, cons(1, s)));
    compare(&s, &[0, 1], 3);
}

#[test]
fn mutually_recursive_pair() {
    let (s1, s2): (Stream<f64>, Stream<f64>) =
        Stream::fix2(|s1, s2| (cons(1.0, s2), cons(0.0, s1)));
    compare(&s1, &[1.0, 0.0], 3);
    compare(&s2, &[0.0, 1.0], 3);
}

#[test]
fn mutual_recursion_through_explicit_bindings() {
    let (a, b) = (Binding::new(), Binding::new());
    let s1: Stream<f64> = a.bind(cons(1.0, &b)).unwrap();
    let s2: Stream<f64> = b.bind(cons(0.0, &a)).unwrap();
    compare(&s1, &[1.0, 0.0], 3);
    compare(&s2, &[0.0, 1.0], 3);
}

#[test]
fn constant_and_derived_streams() {
    let ones: Stream<i32> = Stream::fix(|s| cons(1, s));
    compare(&ones, &[1], 3);

    let twos = &ones + &ones;
    compare(&twos, &[2], 3);

    let pm: Stream<i32> = Stream::fix(|pm| cons(1, -pm));
    compare(&pm, &[1, -1], 3);
}

#[test]
fn running_sum_of_a_named_stream() {
    let ones = Stream::repeat(1i32);
    let nat: Stream<i32> = Stream::fix(|nat| cons(0, nat + &ones));
    assert_eq!(prefix(&nat, 6), [0, 1, 2, 3, 4, 5]);
}

#[test]
fn prefixes_built_by_recursion() {
    let s: Stream<i32> = Stream::fix(|s| helper(1, s));
    let s1: Stream<i32> = Stream::fix(|s1| helper(2, s1));
    let s2: Stream<i32> = Stream::fix(|s2| helper(3, cons(9, s2)));
    let s3: Stream<i32> = Stream::fix(|s3| helper(0, cons(9, s3)));
    let s4: Stream<i32> = Stream::fix(|s4| helper(1, cons(9, s4)));

    compare(&s, &[0], 3);
    compare(&s1, &[0, 1], 3);
    compare(&s2, &[0, 1, 2, 9], 3);
    compare(&s3, &[9], 3);
    compare(&s4, &[0, 9], 3);
}

#[test]
fn coin_change_ways_from_shifted_streams() {
    // ways_k(n) = ways_k(n - coin_k) + ways_{k-1}(n)
    let ones = Stream::repeat(1u64);
    let twos: Stream<u64> = Stream::fix(|s| Stream::prepend(2, 0, s) + &ones);
    let fives: Stream<u64> = Stream::fix(|s| Stream::prepend(5, 0, s) + &twos);

    assert_eq!(prefix(&twos, 7), [1, 1, 2, 2, 3, 3, 4]);
    assert_eq!(fives.begin().nth(10), Some(10));
}

#[test]
fn definitions_force_nothing() {
    let fib: Stream<u64> = Stream::fix(|s| cons(0, s + cons(1, s)));
    let cursor = fib.begin();
    assert_eq!(fib.memoized_len(), 1);
    assert!(cursor.is_forced());

    let doubled = &fib * Stream::repeat(2);
    assert!(!doubled.begin().is_forced());
    assert_eq!(fib.memoized_len(), 1);
}
