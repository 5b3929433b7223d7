use alloy_primitives::{Address, address};
use flowgraph_sdk::{
    cache::{CacheTag, CacheTagKind, Endpoint, invalidation_tags, provide_tags},
    entity::{
        Account, AccountFilter, AccountTokenSnapshot, AccountTokenSnapshotFilter, EntityKind, Index,
        IndexFilter, IndexSubscription, IndexSubscriptionFilter, IndexUpdatedEvent,
        IndexUpdatedEventFilter, Stream, StreamFilter, StreamPeriod, StreamPeriodFilter,
        SubscriptionUnitsUpdatedEvent, SubscriptionUnitsUpdatedEventFilter, Token, TokenFilter,
        TokenStatistic, TokenStatisticFilter,
    },
    query::{Entity, GetQuery, ListQuery, QueryHandler, RelevantAddresses},
    testing::{FakeSubgraph, fixtures},
    types::Instant,
};
use rstest::rstest;

const CHAIN: u64 = 80001;

const A: Address = address!("0x000000000000000000000000000000000000000a");
const B: Address = address!("0x000000000000000000000000000000000000000b");
const C: Address = address!("0x000000000000000000000000000000000000000c");
const DAIX: Address = address!("0x5d8b4c2554aeb7e86f387b4d6c00ac33499ed01f");

fn hex(address: Address) -> String { format!("{address:#x}") }

#[test]
fn test_filter_tags_sender_and_receivers() {
    let filter = StreamPeriodFilter {
        sender: Some(hex(A)),
        receiver_in: Some(vec![hex(B), hex(C)]),
        ..Default::default()
    };
    let addresses = QueryHandler::<StreamPeriod>::new().relevant_addresses_from_filter(Some(&filter));
    assert_eq!(addresses.accounts, vec![A, B, C]);
    assert!(addresses.tokens.is_empty());

    let tags = Endpoint::<StreamPeriod>::new().list_tags(CHAIN, Some(&filter));
    assert_eq!(
        tags,
        vec![
            CacheTag::address(CHAIN, CacheTagKind::Stream, A),
            CacheTag::address(CHAIN, CacheTagKind::Stream, B),
            CacheTag::address(CHAIN, CacheTagKind::Stream, C),
            CacheTag::general(CHAIN, CacheTagKind::Stream),
        ]
    );
}

#[test]
fn test_unconstrained_list_gets_general_tag_only() {
    let endpoint = Endpoint::<StreamPeriod>::new();
    assert_eq!(endpoint.list_tags(CHAIN, None), vec![CacheTag::general(CHAIN, CacheTagKind::Stream)]);

    // Filter without any address still is unscoped
    let filter = StreamPeriodFilter { started_at_timestamp_gte: Some("0".to_string()), ..Default::default() };
    assert_eq!(endpoint.list_tags(CHAIN, Some(&filter)), endpoint.list_tags(CHAIN, None));
}

#[test]
fn test_tags_are_deterministic_and_unique() {
    let filter = StreamPeriodFilter {
        token: Some(hex(DAIX)),
        sender_in: Some(vec![hex(A), hex(A).to_uppercase().replace("0X", "0x")]),
        receiver_not: Some(hex(A)),
        receiver_not_in: Some(vec![hex(B), "not an address".to_string()]),
        ..Default::default()
    };
    let endpoint = Endpoint::<StreamPeriod>::new();
    let tags = endpoint.list_tags(CHAIN, Some(&filter));
    assert_eq!(tags, endpoint.list_tags(CHAIN, Some(&filter)));
    assert_eq!(tags.len(), 4, "{tags:?}");
    for (i, tag) in tags.iter().enumerate() {
        assert!(!tags[i + 1..].contains(tag));
    }

    let addresses = QueryHandler::<StreamPeriod>::new().relevant_addresses_from_filter(Some(&filter));
    assert_eq!(provide_tags(CHAIN, &addresses, CacheTagKind::Stream), tags);
}

#[tokio::test]
async fn test_get_tags_follow_result() {
    let subgraph = FakeSubgraph::new().with_rows(
        EntityKind::StreamPeriod,
        [fixtures::stream_period("period-0", "stream-0", DAIX, A, B, Instant::new(1, 1_650_000_000))],
    );
    let endpoint = Endpoint::<StreamPeriod>::new();

    let found = endpoint.get(&subgraph, CHAIN, &GetQuery::new("period-0")).await.unwrap();
    assert!(found.data.is_some());
    assert_eq!(
        found.tags.iter().map(ToString::to_string).collect::<Vec<_>>(),
        vec![
            "Stream:80001_0x5d8b4c2554aeb7e86f387b4d6c00ac33499ed01f",
            "Stream:80001_0x000000000000000000000000000000000000000a",
            "Stream:80001_0x000000000000000000000000000000000000000b",
            "Stream:80001",
        ]
    );

    let missing = endpoint.get(&subgraph, CHAIN, &GetQuery::new("period-1")).await.unwrap();
    assert!(missing.data.is_none());
    assert!(missing.tags.is_empty());
}

#[tokio::test]
async fn test_list_tags_come_from_filter_not_result() {
    let subgraph = FakeSubgraph::new().with_rows(
        EntityKind::StreamPeriod,
        [
            fixtures::stream_period("period-0", "stream-0", DAIX, A, B, Instant::new(1, 1)),
            fixtures::stream_period("period-1", "stream-1", DAIX, A, C, Instant::new(2, 2)),
        ],
    );
    let query = ListQuery::default().with_filter(StreamPeriodFilter { sender: Some(hex(A)), ..Default::default() });
    let listed = Endpoint::<StreamPeriod>::new().list(&subgraph, CHAIN, &query).await.unwrap();

    assert_eq!(listed.data.items().len(), 2);
    assert_eq!(
        listed.tags,
        vec![CacheTag::address(CHAIN, CacheTagKind::Stream, A), CacheTag::general(CHAIN, CacheTagKind::Stream)]
    );

    // An event of a receiver not in the filter still reaches the list through
    // the sender tag
    let event = invalidation_tags(CHAIN, [A, C], &[CacheTagKind::Stream]);
    assert!(event.iter().any(|tag| listed.tags.contains(tag)));
}

#[test]
fn test_snapshot_endpoint_tag_kinds_differ() {
    let snapshot = Endpoint::<AccountTokenSnapshot>::new();
    let filter = AccountTokenSnapshotFilter {
        account: Some(hex(A)),
        token: Some(hex(DAIX)),
        ..Default::default()
    };
    let tags = snapshot.list_tags(CHAIN, Some(&filter));
    assert!(tags.iter().all(|tag| tag.kind() == CacheTagKind::Token));
    assert_eq!(snapshot.get_tag_kind(), CacheTagKind::Event);

    assert_eq!(Endpoint::<Token>::new().list_tags(1, None), vec![CacheTag::general(1, CacheTagKind::Token)]);
}

#[test]
fn test_query_keys() {
    let endpoint = Endpoint::<StreamPeriod>::new();
    let query = ListQuery::default().with_filter(StreamPeriodFilter { sender: Some(hex(A)), ..Default::default() });

    let key = endpoint.list_key(CHAIN, &query).unwrap();
    assert!(key.starts_with("streamPeriods(80001,"));
    assert_eq!(key, endpoint.list_key(CHAIN, &query.clone()).unwrap());
    assert_ne!(key, endpoint.list_key(CHAIN, &ListQuery::default()).unwrap());

    let key = endpoint.get_key(CHAIN, &GetQuery::new("period-0")).unwrap();
    assert_eq!(key, r#"stream-period(80001,{"block":null,"id":"period-0"})"#);
}

#[cfg(feature = "display")]
#[test]
fn test_tags_table() {
    let tags = Endpoint::<StreamPeriod>::new().list_tags(CHAIN, None);
    let table = tabled::Table::new(&tags).to_string();
    assert!(table.contains("Chain"));
    assert!(table.contains("80001"));
}

fn h(n: u8) -> String { hex(Address::with_last_byte(n)) }

fn addrs(ns: impl IntoIterator<Item = u8>) -> Vec<Address> {
    ns.into_iter().map(Address::with_last_byte).collect()
}

fn from_filter<E: Entity>(filter: E::Filter) -> RelevantAddresses {
    QueryHandler::<E>::new().relevant_addresses_from_filter(Some(&filter))
}

/// Every address operator lands in its bucket, exclusions included.
#[rstest]
#[case::account(
    from_filter::<Account>(AccountFilter {
        id: Some(h(1)),
        id_in: Some(vec![h(2), h(3)]),
        id_not: Some(h(4)),
        id_not_in: Some(vec![h(5)]),
        ..Default::default()
    }),
    vec![],
    addrs(1..=5),
)]
#[case::token(
    from_filter::<Token>(TokenFilter {
        id: Some(h(1)),
        id_in: Some(vec![h(2), h(3)]),
        id_not: Some(h(4)),
        id_not_in: Some(vec![h(5)]),
        underlying_address: Some(h(6)),
        underlying_address_in: Some(vec![h(7)]),
        underlying_address_not: Some(h(8)),
        underlying_address_not_in: Some(vec![h(9)]),
        ..Default::default()
    }),
    addrs(1..=9),
    vec![],
)]
#[case::token_statistic(
    from_filter::<TokenStatistic>(TokenStatisticFilter {
        id: Some(h(1)),
        id_in: Some(vec![h(2), h(3)]),
        id_not: Some(h(4)),
        id_not_in: Some(vec![h(5)]),
        token: Some(h(6)),
        token_in: Some(vec![h(7)]),
        token_not: Some(h(8)),
        token_not_in: Some(vec![h(9)]),
        ..Default::default()
    }),
    addrs(1..=9),
    vec![],
)]
#[case::account_token_snapshot(
    from_filter::<AccountTokenSnapshot>(AccountTokenSnapshotFilter {
        id: Some(format!("{}-{}", h(11), h(1))),
        token: Some(h(1)),
        token_in: Some(vec![h(2), h(3)]),
        token_not: Some(h(4)),
        token_not_in: Some(vec![h(5)]),
        account: Some(h(11)),
        account_in: Some(vec![h(12)]),
        account_not: Some(h(13)),
        account_not_in: Some(vec![h(14)]),
        ..Default::default()
    }),
    addrs(1..=5),
    addrs(11..=14),
)]
#[case::stream(
    from_filter::<Stream>(StreamFilter {
        id: Some(format!("{}-{}-{}-0", h(11), h(21), h(1))),
        token: Some(h(1)),
        token_in: Some(vec![h(2), h(3)]),
        token_not: Some(h(4)),
        token_not_in: Some(vec![h(5)]),
        sender: Some(h(11)),
        sender_in: Some(vec![h(12)]),
        sender_not: Some(h(13)),
        sender_not_in: Some(vec![h(14)]),
        receiver: Some(h(21)),
        receiver_in: Some(vec![h(22)]),
        receiver_not: Some(h(23)),
        receiver_not_in: Some(vec![h(24)]),
        ..Default::default()
    }),
    addrs(1..=5),
    addrs([11, 12, 13, 14, 21, 22, 23, 24]),
)]
#[case::stream_period(
    from_filter::<StreamPeriod>(StreamPeriodFilter {
        token: Some(h(1)),
        token_in: Some(vec![h(2), h(3)]),
        token_not: Some(h(4)),
        token_not_in: Some(vec![h(5)]),
        sender: Some(h(11)),
        sender_in: Some(vec![h(12)]),
        sender_not: Some(h(13)),
        sender_not_in: Some(vec![h(14)]),
        receiver: Some(h(21)),
        receiver_in: Some(vec![h(22)]),
        receiver_not: Some(h(23)),
        receiver_not_in: Some(vec![h(24)]),
        stream: Some(h(99)),
        ..Default::default()
    }),
    addrs(1..=5),
    addrs([11, 12, 13, 14, 21, 22, 23, 24]),
)]
#[case::index(
    from_filter::<Index>(IndexFilter {
        id: Some(h(99)),
        token: Some(h(1)),
        token_in: Some(vec![h(2), h(3)]),
        token_not: Some(h(4)),
        token_not_in: Some(vec![h(5)]),
        publisher: Some(h(11)),
        publisher_in: Some(vec![h(12)]),
        publisher_not: Some(h(13)),
        publisher_not_in: Some(vec![h(14)]),
        ..Default::default()
    }),
    addrs(1..=5),
    addrs(11..=14),
)]
#[case::index_subscription(
    from_filter::<IndexSubscription>(IndexSubscriptionFilter {
        id: Some(h(99)),
        subscriber: Some(h(21)),
        subscriber_in: Some(vec![h(22)]),
        subscriber_not: Some(h(23)),
        subscriber_not_in: Some(vec![h(24)]),
        index: Some(h(98)),
        ..Default::default()
    }),
    vec![],
    addrs(21..=24),
)]
#[case::index_updated_event(
    from_filter::<IndexUpdatedEvent>(IndexUpdatedEventFilter {
        id: Some(h(99)),
        token: Some(h(1)),
        token_in: Some(vec![h(2), h(3)]),
        token_not: Some(h(4)),
        token_not_in: Some(vec![h(5)]),
        publisher: Some(h(11)),
        publisher_in: Some(vec![h(12)]),
        publisher_not: Some(h(13)),
        publisher_not_in: Some(vec![h(14)]),
        index: Some(h(98)),
        ..Default::default()
    }),
    addrs(1..=5),
    addrs(11..=14),
)]
#[case::subscription_units_updated_event(
    from_filter::<SubscriptionUnitsUpdatedEvent>(SubscriptionUnitsUpdatedEventFilter {
        id: Some(h(99)),
        token: Some(h(1)),
        token_in: Some(vec![h(2), h(3)]),
        token_not: Some(h(4)),
        token_not_in: Some(vec![h(5)]),
        publisher: Some(h(11)),
        publisher_in: Some(vec![h(12)]),
        publisher_not: Some(h(13)),
        publisher_not_in: Some(vec![h(14)]),
        subscriber: Some(h(21)),
        subscriber_in: Some(vec![h(22)]),
        subscriber_not: Some(h(23)),
        subscriber_not_in: Some(vec![h(24)]),
        subscription: Some(h(98)),
        ..Default::default()
    }),
    addrs(1..=5),
    addrs([11, 12, 13, 14, 21, 22, 23, 24]),
)]
fn test_filter_address_buckets(
    #[case] found: RelevantAddresses,
    #[case] tokens: Vec<Address>,
    #[case] accounts: Vec<Address>,
) {
    assert_eq!(found.tokens, tokens);
    assert_eq!(found.accounts, accounts);
}

