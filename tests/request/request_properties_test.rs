//! Algebraic properties of request transforms.

#[path = "../common/mod.rs"]
mod common;

use bard::model::{Interval, TimeZone};
use bard::request::{AsyncAfter, DataApiRequest, OrderByColumn, ResponseFormat, SortColumn};
use chrono::{Duration, TimeZone as _, Utc};
use common::{build, catalog, valid_params};
use proptest::prelude::*;
use std::num::NonZeroU32;

fn interval_strategy() -> impl Strategy<Value = Interval> {
    (0i64..3650, 1i64..400).prop_map(|(offset, length)| {
        let start = Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).unwrap() + Duration::days(offset);
        Interval::new(start, start + Duration::days(length)).unwrap()
    })
}

fn format_strategy() -> impl Strategy<Value = ResponseFormat> {
    prop::sample::select(vec![
        ResponseFormat::Json,
        ResponseFormat::JsonApi,
        ResponseFormat::Csv,
        ResponseFormat::Debug,
    ])
}

fn async_strategy() -> impl Strategy<Value = AsyncAfter> {
    prop_oneof![
        Just(AsyncAfter::Never),
        Just(AsyncAfter::Always),
        any::<u64>().prop_map(AsyncAfter::After),
    ]
}

fn sort_strategy() -> impl Strategy<Value = Vec<OrderByColumn>> {
    let column = prop::sample::select(vec![
        SortColumn::DateTime,
        SortColumn::Metric("revenue".into()),
        SortColumn::Metric("clicks".into()),
    ]);
    prop::collection::vec(
        (column, any::<bool>()).prop_map(|(column, asc)| {
            if asc {
                OrderByColumn::asc(column)
            } else {
                OrderByColumn::desc(column)
            }
        }),
        0..5,
    )
}

fn base() -> DataApiRequest {
    build(&catalog(), &valid_params())
}

proptest! {
    #[test]
    fn prop_with_intervals_is_idempotent(intervals in prop::collection::vec(interval_strategy(), 0..4)) {
        let request = base();

        let once = request.with_intervals(intervals.clone());
        let twice = once.with_intervals(intervals);

        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_with_sorts_is_idempotent(sorts in sort_strategy()) {
        let request = base();

        let once = request.with_sorts(sorts.clone());
        let twice = once.with_sorts(once.sorts().to_vec());

        prop_assert_eq!(once.sorts(), twice.sorts());
        prop_assert_eq!(once, request.with_sorts(sorts.clone()).with_sorts(sorts));
    }

    #[test]
    fn prop_independent_transforms_commute(
        intervals in prop::collection::vec(interval_strategy(), 1..3),
        format in format_strategy(),
        async_after in async_strategy(),
        count in 1u32..1000,
        offset_hours in -12i32..=14,
        sorts in sort_strategy(),
    ) {
        let request = base();
        let count = NonZeroU32::new(count);
        let zone = TimeZone::parse(&format!("{:+03}:00", offset_hours)).unwrap();

        let forward = request
            .with_intervals(intervals.clone())
            .with_format(format)
            .with_async_after(async_after)
            .with_count(count)
            .with_time_zone(zone)
            .with_sorts(sorts.clone());
        let backward = request
            .with_sorts(sorts)
            .with_time_zone(zone)
            .with_count(count)
            .with_async_after(async_after)
            .with_format(format)
            .with_intervals(intervals);

        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn prop_transform_never_mutates_source(format in format_strategy(), count in 1u32..50) {
        let request = base();
        let snapshot = request.clone();

        let _ = request.with_format(format).with_count(NonZeroU32::new(count));

        prop_assert_eq!(request, snapshot);
    }
}
