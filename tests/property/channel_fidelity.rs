use proptest::prelude::*;
use logrun::clock::Clock;
use logrun::exec::{Heartbeat, Multiplexer, Stopwatch, StreamChannel};
use logrun::types::{HeartbeatLevel, Stream};
use logrun_test_utils::clock::{EPOCH_2024, ManualClock};
use logrun_test_utils::sinks::CapturedSinks;
use tokio_test::io::{Builder, Mock};

// Split `data` into non-empty chunks at the given (wrapped) cut lengths.
fn chunked(data: &[u8], cuts: &[usize]) -> Vec<Vec<u8>> {
    let mut chunks = Vec::new();
    let mut rest = data;
    let mut cut = cuts.iter().cycle();
    while !rest.is_empty() {
        let n = cut.next().copied().unwrap_or(rest.len()).clamp(1, rest.len());
        let (head, tail) = rest.split_at(n);
        chunks.push(head.to_vec());
        rest = tail;
    }
    chunks
}

fn reader(chunks: &[Vec<u8>]) -> Mock {
    let mut b = Builder::new();
    for c in chunks {
        b.read(c);
    }
    b.build()
}

/// Run both channels through the multiplexer and return the captured sinks.
fn multiplex(stdout: &[Vec<u8>], stderr: &[Vec<u8>], level: u8) -> CapturedSinks {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime");

    let sinks = CapturedSinks::new();
    let chans = [
        StreamChannel::new(Stream::Stdout, reader(stdout), sinks.stdout_route()),
        StreamChannel::new(Stream::Stderr, reader(stderr), sinks.stderr_route()),
    ];
    rt.block_on(async {
        let clock = ManualClock::new(EPOCH_2024);
        let heartbeat = Heartbeat::new(HeartbeatLevel(level), clock.now().expect("clock"));
        let stopwatch = Stopwatch::start(&clock).expect("clock");
        Multiplexer::new(&clock, stopwatch, heartbeat, sinks.stderr_route())
            .run(chans)
            .await
            .expect("multiplex");
    });
    sinks
}

proptest! {
    #[test]
    fn stdout_is_copied_byte_for_byte(
        data in proptest::collection::vec(any::<u8>(), 0..8192),
        cuts in proptest::collection::vec(1usize..1024, 1..16),
        level in 0u8..4,
    ) {
        let sinks = multiplex(&chunked(&data, &cuts), &[], level);

        prop_assert_eq!(sinks.stdout.bytes(), data.clone());
        prop_assert_eq!(sinks.log.bytes(), data);
        prop_assert!(sinks.stderr.bytes().is_empty());
    }

    #[test]
    fn each_stream_keeps_its_own_order_when_interleaved(
        out in proptest::collection::vec(any::<u8>(), 1..2048),
        err in proptest::collection::vec(any::<u8>(), 1..2048),
        cuts in proptest::collection::vec(1usize..256, 1..8),
    ) {
        let sinks = multiplex(&chunked(&out, &cuts), &chunked(&err, &cuts), 0);

        prop_assert_eq!(sinks.stdout.bytes(), out.clone());
        prop_assert_eq!(sinks.stderr.bytes(), err.clone());
        // The log holds every byte of both streams exactly once.
        let mut log = sinks.log.bytes();
        let mut all = [out, err].concat();
        log.sort_unstable();
        all.sort_unstable();
        prop_assert_eq!(log, all);
    }
}
