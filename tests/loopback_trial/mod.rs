use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use swiftarq::frame::serial::SegmentReader;
use swiftarq::frame::{self, SegmentHeader};
use swiftarq::Kcp;

/// Impairments applied to one direction of the simulated link.
#[derive(Clone, Debug)]
pub struct LinkConfig {
    pub loss_percent: u32,
    pub duplicate_percent: u32,
    pub delay_ms: u32,
    /// Extra random delay per frame, which also reorders frames
    pub jitter_ms: u32,
    pub seed: u64,
}

impl LinkConfig {
    pub fn perfect() -> Self {
        Self {
            loss_percent: 0,
            duplicate_percent: 0,
            delay_ms: 0,
            jitter_ms: 0,
            seed: 0,
        }
    }
}

/// One direction of a lossy datagram link driven by a manual clock.
pub struct Link {
    config: LinkConfig,
    rng: StdRng,
    in_flight: Vec<(u32, Vec<u8>)>,
    /// Every segment handed to the link, dropped or not
    pub sent: Vec<SegmentHeader>,
    pub frames_sent: usize,
}

impl Link {
    pub fn new(config: LinkConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            in_flight: Vec::new(),
            sent: Vec::new(),
            frames_sent: 0,
        }
    }

    pub fn send(&mut self, now_ms: u32, frame_bytes: &[u8]) {
        self.frames_sent += 1;

        let conv = frame::peek_conv(frame_bytes).expect("frame shorter than conv");
        for record in SegmentReader::new(frame_bytes, conv) {
            let (header, _) = record.expect("engine emitted a malformed frame");
            self.sent.push(header);
        }

        if self.rng.gen_range(0..100) < self.config.loss_percent {
            return;
        }

        let copies = if self.rng.gen_range(0..100) < self.config.duplicate_percent {
            2
        } else {
            1
        };

        for _ in 0..copies {
            let jitter = if self.config.jitter_ms > 0 {
                self.rng.gen_range(0..=self.config.jitter_ms)
            } else {
                0
            };

            let deliver_ms = now_ms.wrapping_add(self.config.delay_ms + jitter);
            self.in_flight.push((deliver_ms, frame_bytes.to_vec()));
        }
    }

    /// Removes and returns every frame due by `now_ms`, in delivery order.
    pub fn poll(&mut self, now_ms: u32) -> Vec<Vec<u8>> {
        let (mut due, pending): (Vec<_>, Vec<_>) = self
            .in_flight
            .drain(..)
            .partition(|(deliver_ms, _)| swiftarq::epoch::time_diff(now_ms, *deliver_ms) >= 0);

        self.in_flight = pending;

        due.sort_by_key(|(deliver_ms, _)| swiftarq::epoch::time_diff(*deliver_ms, now_ms));
        due.into_iter().map(|(_, frame_bytes)| frame_bytes).collect()
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty()
    }
}

/// Two connections joined by a pair of links. `a` sends to `b` over `ab`.
pub struct Pair {
    pub a: Kcp,
    pub b: Kcp,
    pub ab: Link,
    pub ba: Link,
}

impl Pair {
    pub fn new(conv: u32, config: &swiftarq::Config, link: LinkConfig) -> Self {
        let mut reverse = link.clone();
        reverse.seed = link.seed.wrapping_add(1);

        Self {
            a: Kcp::with_config(conv, config).expect("invalid connection config"),
            b: Kcp::with_config(conv, config).expect("invalid connection config"),
            ab: Link::new(link),
            ba: Link::new(reverse),
        }
    }

    /// Advances both connections to `now_ms` and delivers whatever the links let through.
    pub fn step(&mut self, now_ms: u32) {
        let ab = &mut self.ab;
        let ba = &mut self.ba;

        self.a.update(now_ms, &mut |f: &[u8]| ab.send(now_ms, f));
        self.b.update(now_ms, &mut |f: &[u8]| ba.send(now_ms, f));

        for frame_bytes in ab.poll(now_ms) {
            self.b
                .input(&frame_bytes, true, false, now_ms, &mut |f: &[u8]| {
                    ba.send(now_ms, f)
                })
                .expect("rejected frame");
        }

        for frame_bytes in ba.poll(now_ms) {
            self.a
                .input(&frame_bytes, true, false, now_ms, &mut |f: &[u8]| {
                    ab.send(now_ms, f)
                })
                .expect("rejected frame");
        }
    }
}

/// Drains every complete message waiting in `kcp`.
pub fn recv_all(kcp: &mut Kcp) -> Vec<Vec<u8>> {
    let mut messages = Vec::new();

    while let Some(size) = kcp.peek_size() {
        let mut buf = vec![0; size];
        let n = kcp.recv(&mut buf).expect("peeked message vanished");
        assert_eq!(n, size);
        messages.push(buf);
    }

    messages
}

pub fn random_messages(seed: u64, count: usize, size_distribution: &[usize]) -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(seed);

    (0..count)
        .map(|_| {
            let max_size = size_distribution[rng.gen_range(0..size_distribution.len())];
            let size = rng.gen_range(1..=max_size);
            (0..size).map(|_| rng.gen::<u8>()).collect()
        })
        .collect()
}

pub fn digest(messages: &[Vec<u8>]) -> [u8; 16] {
    let mut md5_ctx = md5::Context::new();
    for message in messages {
        md5_ctx.consume(message);
    }
    md5_ctx.compute().into()
}

pub struct TransferConfig {
    pub conv: u32,
    pub kcp: swiftarq::Config,
    pub link: LinkConfig,
    pub messages: Vec<Vec<u8>>,
    pub start_ms: u32,
    pub tick_ms: u32,
    pub timeout_ms: u32,
}

#[derive(Debug)]
pub struct TransferSummary {
    pub received: Vec<Vec<u8>>,
    pub elapsed_ms: u32,
    pub complete: bool,
    pub sender_wait_snd: usize,
    pub sender_dead: bool,
}

/// Sends every message from `a` to `b` and steps the clock until all bytes were delivered and
/// acknowledged, or the timeout expires. Checks sequence monotonicity along the way.
pub fn run_transfer(config: TransferConfig) -> TransferSummary {
    let mut pair = Pair::new(config.conv, &config.kcp, config.link);

    for message in config.messages.iter() {
        pair.a.send(message).expect("send rejected");
    }

    let total_bytes: usize = config.messages.iter().map(Vec::len).sum();

    let mut received = Vec::new();
    let mut received_bytes = 0;
    let mut elapsed_ms = 0;
    let mut complete = false;

    let mut prev_snd_una = pair.a.snd_una();
    let mut prev_rcv_nxt = pair.b.rcv_nxt();

    while elapsed_ms <= config.timeout_ms {
        let now_ms = config.start_ms.wrapping_add(elapsed_ms);

        pair.step(now_ms);
        for message in recv_all(&mut pair.b) {
            received_bytes += message.len();
            received.push(message);
        }

        assert!(swiftarq::epoch::time_diff(pair.a.snd_una(), prev_snd_una) >= 0);
        assert!(swiftarq::epoch::time_diff(pair.b.rcv_nxt(), prev_rcv_nxt) >= 0);
        prev_snd_una = pair.a.snd_una();
        prev_rcv_nxt = pair.b.rcv_nxt();

        if received_bytes >= total_bytes && pair.a.wait_snd() == 0 {
            complete = true;
            break;
        }

        elapsed_ms += config.tick_ms;
    }

    TransferSummary {
        received,
        elapsed_ms,
        complete,
        sender_wait_snd: pair.a.wait_snd(),
        sender_dead: pair.a.is_dead(),
    }
}
