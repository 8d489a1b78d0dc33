use std::collections::VecDeque;

use tracing::warn;

use super::config::{self, Config};
use super::epoch::time_diff;
use super::error::{Error, Result};
use super::frame::serial::{FrameWriter, SegmentReader};
use super::frame::{self, Command, SegmentHeader};
use super::log::{arq_log, LogMask};

mod cc;
mod probe;
mod rtt;
mod segment;

pub use segment::Segment;

// A message may be split into at most this many segments; frg counts down from FRAGMENT_MAX - 1
const FRAGMENT_MAX: usize = 255;

// Clock jumps beyond this resynchronize the flush schedule instead of catching up
const CLOCK_SKEW_MAX_MS: i32 = 10_000;

/// Receives frames ready to be handed to the transport.
///
/// Called synchronously from within [`Kcp::flush`]. Implementations should not block.
pub trait Output {
    fn emit(&mut self, frame_bytes: &[u8]);
}

impl<F> Output for F
where
    F: FnMut(&[u8]),
{
    fn emit(&mut self, frame_bytes: &[u8]) {
        self(frame_bytes)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum State {
    /// No operation has been performed yet.
    Unstarted,
    Active,
    /// Some segment reached the dead-link transmission limit. The connection keeps working;
    /// tearing it down is up to the owner.
    Dead,
}

#[derive(Clone, Copy, Debug)]
struct AckItem {
    sn: u32,
    ts: u32,
}

//               snd_una        snd_nxt     snd_una + cwnd
//               v              v           v
// snd_buf:      [acked/in flight]
// snd_queue:                   [admitted on flush while below the window] ...
//
//               rcv_nxt                    rcv_nxt + rcv_wnd
//               v                          v
// rcv_queue: ...] (in order, awaiting recv)
// rcv_buf:      [out of order, sorted by sn]

/// State of one ARQ connection.
///
/// All operations are synchronous and bounded. Time is supplied by the caller as milliseconds
/// since an arbitrary epoch, see [`Epoch`](crate::Epoch).
pub struct Kcp {
    conv: u32,
    state: State,

    mtu: usize,
    mss: usize,
    reserved: usize,
    stream: bool,

    // Sender state
    snd_una: u32,
    snd_nxt: u32,
    snd_wnd: u32,
    rmt_wnd: u32,
    snd_queue: VecDeque<Segment>,
    snd_buf: VecDeque<Segment>,
    cc: cc::CongestionWindow,
    congestion_control: bool,
    fast_resend: u32,
    nodelay: bool,
    dead_link: u32,

    // Receiver state
    rcv_nxt: u32,
    rcv_wnd: u32,
    rcv_queue: VecDeque<Segment>,
    rcv_buf: VecDeque<Segment>,
    acklist: Vec<AckItem>,

    rtt: rtt::RttEstimator,

    probe: probe::Probe,
    probe_timer: probe::ProbeTimer,

    interval: u32,
    ts_flush: u32,
    updated: bool,

    writer: FrameWriter,

    log_mask: LogMask,
}

impl Kcp {
    /// Creates a connection with the default configuration. Both endpoints must use the same
    /// `conv`.
    pub fn new(conv: u32) -> Self {
        let mtu = config::MTU_DEF;
        let mss = mtu - frame::OVERHEAD;

        Self {
            conv,
            state: State::Unstarted,
            mtu,
            mss,
            reserved: 0,
            stream: false,
            snd_una: 0,
            snd_nxt: 0,
            snd_wnd: config::WND_SND,
            rmt_wnd: config::WND_RCV,
            snd_queue: VecDeque::new(),
            snd_buf: VecDeque::new(),
            cc: cc::CongestionWindow::new(mss),
            congestion_control: true,
            fast_resend: 0,
            nodelay: false,
            dead_link: config::DEADLINK,
            rcv_nxt: 0,
            rcv_wnd: config::WND_RCV,
            rcv_queue: VecDeque::new(),
            rcv_buf: VecDeque::new(),
            acklist: Vec::new(),
            rtt: rtt::RttEstimator::new(),
            probe: probe::Probe::empty(),
            probe_timer: Default::default(),
            interval: config::INTERVAL_DEF,
            ts_flush: config::INTERVAL_DEF,
            updated: false,
            writer: FrameWriter::new(mtu, 0),
            log_mask: LogMask::empty(),
        }
    }

    pub fn with_config(conv: u32, config: &Config) -> Result<Self> {
        config.validate()?;

        let mut kcp = Self::new(conv);
        kcp.set_nodelay(
            config.nodelay,
            config.interval_ms,
            config.fast_resend,
            !config.congestion_control,
        );
        kcp.set_window_size(config.snd_wnd, config.rcv_wnd)?;
        kcp.set_mtu(config.mtu)?;
        kcp.reserve_bytes(config.reserved)?;
        kcp.set_stream_mode(config.stream);
        kcp.set_dead_link(config.dead_link)?;
        kcp.set_log_mask(config.log_mask);

        Ok(kcp)
    }

    fn activate(&mut self) {
        if self.state == State::Unstarted {
            self.state = State::Active;
        }
    }

    /// Queues a message for sending. Nothing is transmitted until the next flush.
    ///
    /// In stream mode the data may be merged into the last queued segment, and message
    /// boundaries are not preserved.
    pub fn send(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Err(Error::EmptyInput);
        }

        // Room left in the newest unsent segment, only used in stream mode
        let tail_room = match self.snd_queue.back() {
            Some(tail) if self.stream && tail.len() < self.mss => self.mss - tail.len(),
            _ => 0,
        };

        let merged = tail_room.min(bytes.len());
        let rest = &bytes[merged..];
        let count = (rest.len() + self.mss - 1) / self.mss;

        if count > FRAGMENT_MAX {
            return Err(Error::MessageTooLarge { fragments: count });
        }

        self.activate();

        if merged > 0 {
            if let Some(tail) = self.snd_queue.back_mut() {
                tail.data.write_bytes(&bytes[..merged]);
            }
        }

        for (i, chunk) in rest.chunks(self.mss).enumerate() {
            let frg = if self.stream {
                0
            } else {
                (count - i - 1) as u8
            };

            self.snd_queue.push_back(Segment::with_payload(chunk, frg));
        }

        arq_log!(
            self.log_mask,
            SEND,
            "send: conv={} len={} segments={}",
            self.conv,
            bytes.len(),
            count
        );

        Ok(())
    }

    /// Size of the next complete message, if one is ready.
    pub fn peek_size(&self) -> Option<usize> {
        let front = self.rcv_queue.front()?;

        if front.frg == 0 {
            return Some(front.len());
        }

        if self.rcv_queue.len() < usize::from(front.frg) + 1 {
            return None;
        }

        let mut size = 0;
        for seg in self.rcv_queue.iter() {
            size += seg.len();
            if seg.frg == 0 {
                break;
            }
        }

        Some(size)
    }

    /// Copies the next complete message into `buffer` and returns its length.
    ///
    /// If `buffer` is too small, nothing is consumed.
    pub fn recv(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let size = self.peek_size().ok_or(Error::NothingToRead)?;

        if size > buffer.len() {
            return Err(Error::BufferTooSmall {
                needed: size,
                available: buffer.len(),
            });
        }

        let fast_recover = self.rcv_queue.len() >= self.rcv_wnd as usize;

        let mut n = 0;
        while let Some(seg) = self.rcv_queue.pop_front() {
            let payload = seg.payload();
            buffer[n..n + payload.len()].copy_from_slice(payload);
            n += payload.len();

            arq_log!(self.log_mask, RECV, "recv: conv={} sn={}", self.conv, seg.sn);

            if seg.frg == 0 {
                break;
            }
        }

        debug_assert_eq!(n, size);

        self.promote_received();

        if fast_recover && self.rcv_queue.len() < self.rcv_wnd as usize {
            // The window reopened, tell the remote on the next flush
            self.probe |= probe::Probe::ASK_TELL;
        }

        Ok(n)
    }

    // Moves in-order segments from rcv_buf to rcv_queue while the receive window allows
    fn promote_received(&mut self) {
        while let Some(seg) = self.rcv_buf.front() {
            if seg.sn != self.rcv_nxt || self.rcv_queue.len() >= self.rcv_wnd as usize {
                break;
            }

            if let Some(seg) = self.rcv_buf.pop_front() {
                self.rcv_queue.push_back(seg);
                self.rcv_nxt = self.rcv_nxt.wrapping_add(1);
            }
        }
    }

    fn shrink_buf(&mut self) {
        self.snd_una = match self.snd_buf.front() {
            Some(seg) => seg.sn,
            None => self.snd_nxt,
        };
    }

    // Drops every segment the remote has cumulatively acknowledged
    fn parse_una(&mut self, una: u32) -> usize {
        let mut count = 0;

        while let Some(seg) = self.snd_buf.front() {
            if time_diff(una, seg.sn) <= 0 {
                break;
            }

            self.snd_buf.pop_front();
            count += 1;
        }

        count
    }

    fn in_send_window(&self, sn: u32) -> bool {
        time_diff(sn, self.snd_una) >= 0 && time_diff(sn, self.snd_nxt) < 0
    }

    fn parse_ack(&mut self, sn: u32) {
        if !self.in_send_window(sn) {
            return;
        }

        for seg in self.snd_buf.iter_mut() {
            if seg.sn == sn {
                // Stays in snd_buf until una passes it, but is no longer resent
                seg.acked = true;
                break;
            }

            if time_diff(sn, seg.sn) < 0 {
                break;
            }
        }
    }

    fn parse_fastack(&mut self, sn: u32, ts: u32) {
        if !self.in_send_window(sn) {
            return;
        }

        for seg in self.snd_buf.iter_mut() {
            if time_diff(sn, seg.sn) < 0 {
                break;
            }

            if seg.sn != sn && time_diff(seg.ts, ts) <= 0 {
                seg.fastack += 1;
            }
        }
    }

    fn parse_data(&mut self, new_seg: Segment) {
        let sn = new_seg.sn;

        let mut insert_idx = 0;
        let mut repeat = false;

        for (i, seg) in self.rcv_buf.iter().enumerate().rev() {
            if seg.sn == sn {
                repeat = true;
                break;
            }

            if time_diff(sn, seg.sn) > 0 {
                insert_idx = i + 1;
                break;
            }
        }

        if !repeat {
            self.rcv_buf.insert(insert_idx, new_seg);
        }

        self.promote_received();
    }

    /// Processes a frame received from the transport.
    ///
    /// `regular` marks frames whose window and timestamps can be trusted, i.e. not reconstructed
    /// or delivered out of band. Only regular frames update the remote window and the RTT.
    ///
    /// With `ack_no_delay`, pending acks are sent immediately instead of waiting for the next
    /// update.
    ///
    /// Parsing stops at the first malformed record. Records before it stay applied.
    pub fn input<O>(
        &mut self,
        frame_bytes: &[u8],
        regular: bool,
        ack_no_delay: bool,
        now_ms: u32,
        out: &mut O,
    ) -> Result<()>
    where
        O: Output,
    {
        if frame_bytes.len() < frame::OVERHEAD {
            return Err(Error::TruncatedHeader {
                remaining: frame_bytes.len(),
            });
        }

        self.activate();

        arq_log!(
            self.log_mask,
            INPUT,
            "[RI] conv={} {} bytes",
            self.conv,
            frame_bytes.len()
        );

        let prev_una = self.snd_una;
        let mut window_slides = false;
        let mut outcome = Ok(());

        for record in SegmentReader::new(frame_bytes, self.conv) {
            let (header, payload) = match record {
                Ok(record) => record,
                Err(err) => {
                    outcome = Err(err);
                    break;
                }
            };

            let sn_in_flight = self.in_send_window(header.sn);

            if regular {
                self.rmt_wnd = u32::from(header.wnd);
            }

            if self.parse_una(header.una) > 0 {
                window_slides = true;
            }
            self.shrink_buf();

            match header.cmd {
                Command::Ack => {
                    let rtt = time_diff(now_ms, header.ts);
                    if regular && sn_in_flight && rtt >= 0 {
                        self.rtt.update(rtt, self.interval);
                    }

                    self.parse_ack(header.sn);
                    self.parse_fastack(header.sn, header.ts);

                    arq_log!(
                        self.log_mask,
                        IN_ACK,
                        "input ack: sn={} ts={} rtt={} rto={}",
                        header.sn,
                        header.ts,
                        rtt,
                        self.rtt.rto()
                    );
                }
                Command::Push => {
                    arq_log!(
                        self.log_mask,
                        IN_DATA,
                        "input psh: sn={} ts={}",
                        header.sn,
                        header.ts
                    );

                    let window_end = self.rcv_nxt.wrapping_add(self.rcv_wnd);

                    if time_diff(header.sn, window_end) < 0 {
                        self.acklist.push(AckItem {
                            sn: header.sn,
                            ts: header.ts,
                        });

                        if time_diff(header.sn, self.rcv_nxt) >= 0 {
                            self.parse_data(Segment::received(&header, payload));
                        }
                    }
                }
                Command::WindowAsk => {
                    self.probe |= probe::Probe::ASK_TELL;

                    arq_log!(self.log_mask, IN_PROBE, "input probe");
                }
                Command::WindowTell => {
                    arq_log!(self.log_mask, IN_WINS, "input wins: {}", header.wnd);
                }
            }
        }

        if self.congestion_control && time_diff(self.snd_una, prev_una) > 0 {
            self.cc.handle_ack(self.rmt_wnd);
        }

        if window_slides {
            self.flush(false, now_ms, out);
        } else if ack_no_delay && !self.acklist.is_empty() {
            self.flush(true, now_ms, out);
        }

        outcome
    }

    fn wnd_unused(&self) -> u16 {
        let queued = self.rcv_queue.len() as u32;

        if queued < self.rcv_wnd {
            (self.rcv_wnd - queued) as u16
        } else {
            0
        }
    }

    // Starts a new frame if `size` more bytes would overflow the current one
    fn make_space<O>(writer: &mut FrameWriter, size: usize, log_mask: LogMask, out: &mut O)
    where
        O: Output,
    {
        if !writer.fits(size) {
            Self::emit_frame(writer, log_mask, out);
        }
    }

    fn emit_frame<O>(writer: &mut FrameWriter, log_mask: LogMask, out: &mut O)
    where
        O: Output,
    {
        if writer.is_empty() {
            return;
        }

        arq_log!(log_mask, OUTPUT, "[RO] {} bytes", writer.frame().len());

        out.emit(writer.frame());
        writer.reset();
    }

    /// Transmits pending acks, window probes, new data and due retransmissions.
    ///
    /// With `ack_only`, only the pending acks are sent. Returns the number of milliseconds until
    /// the nearest retransmission deadline, bounded by the flush interval.
    pub fn flush<O>(&mut self, ack_only: bool, now_ms: u32, out: &mut O) -> u32
    where
        O: Output,
    {
        let log_mask = self.log_mask;

        let mut header = SegmentHeader {
            conv: self.conv,
            cmd: Command::Ack,
            frg: 0,
            wnd: self.wnd_unused(),
            ts: 0,
            sn: 0,
            una: self.rcv_nxt,
            len: 0,
        };

        self.writer.reset();

        for ack in self.acklist.iter() {
            Self::make_space(&mut self.writer, frame::OVERHEAD, log_mask, out);

            header.sn = ack.sn;
            header.ts = ack.ts;
            self.writer.write_header(&header);

            arq_log!(log_mask, OUT_ACK, "output ack: sn={}", ack.sn);
        }
        self.acklist.clear();

        if ack_only {
            Self::emit_frame(&mut self.writer, log_mask, out);
            return self.interval;
        }

        if self.probe_timer.poll(self.rmt_wnd, now_ms) {
            self.probe |= probe::Probe::ASK_SEND;
        }

        if self.probe.contains(probe::Probe::ASK_SEND) {
            header.cmd = Command::WindowAsk;
            Self::make_space(&mut self.writer, frame::OVERHEAD, log_mask, out);
            self.writer.write_header(&header);

            arq_log!(log_mask, OUT_PROBE, "output probe");
        }

        if self.probe.contains(probe::Probe::ASK_TELL) {
            header.cmd = Command::WindowTell;
            Self::make_space(&mut self.writer, frame::OVERHEAD, log_mask, out);
            self.writer.write_header(&header);

            arq_log!(log_mask, OUT_WINS, "output wins: {}", header.wnd);
        }

        self.probe = probe::Probe::empty();

        // Admit queued segments while below the effective window
        let mut cwnd = self.snd_wnd.min(self.rmt_wnd);
        if self.congestion_control {
            cwnd = cwnd.min(self.cc.cwnd());
        }

        let mut new_segments = 0;
        while time_diff(self.snd_nxt, self.snd_una.wrapping_add(cwnd)) < 0 {
            let Some(mut seg) = self.snd_queue.pop_front() else {
                break;
            };

            seg.conv = self.conv;
            seg.cmd = Command::Push;
            seg.sn = self.snd_nxt;
            self.snd_buf.push_back(seg);

            self.snd_nxt = self.snd_nxt.wrapping_add(1);
            new_segments += 1;
        }

        let resend_threshold = if self.fast_resend > 0 {
            self.fast_resend
        } else {
            u32::MAX
        };

        let rx_rto = self.rtt.rto();
        let mut change = 0;
        let mut lost = 0;
        let mut min_rto = self.interval as i32;

        for seg in self.snd_buf.iter_mut() {
            if seg.acked {
                continue;
            }

            let mut need_send = false;

            if seg.xmit == 0 {
                // Initial transmission
                need_send = true;
                seg.rto = rx_rto;
                seg.resendts = now_ms.wrapping_add(seg.rto);
            } else if seg.fastack >= resend_threshold {
                // Fast retransmit
                need_send = true;
                seg.fastack = 0;
                seg.rto = rx_rto;
                seg.resendts = now_ms.wrapping_add(seg.rto);
                change += 1;
            } else if seg.fastack > 0 && new_segments == 0 {
                // Early retransmit
                need_send = true;
                seg.fastack = 0;
                seg.rto = rx_rto;
                seg.resendts = now_ms.wrapping_add(seg.rto);
                change += 1;
            } else if time_diff(now_ms, seg.resendts) >= 0 {
                // Retransmission timeout
                need_send = true;
                seg.rto = if self.nodelay {
                    seg.rto.saturating_add(rx_rto / 2)
                } else {
                    seg.rto.saturating_add(rx_rto)
                };
                seg.fastack = 0;
                seg.resendts = now_ms.wrapping_add(seg.rto);
                lost += 1;
            }

            if need_send {
                seg.xmit += 1;
                seg.ts = now_ms;
                seg.wnd = header.wnd;
                seg.una = header.una;

                Self::make_space(
                    &mut self.writer,
                    frame::OVERHEAD + seg.len(),
                    log_mask,
                    out,
                );
                self.writer.write_header(&seg.header());
                self.writer.write_slice(seg.payload());

                if seg.xmit >= self.dead_link && self.state != State::Dead {
                    warn!(
                        target: "swiftarq",
                        "conv={} dead link: sn={} sent {} times",
                        self.conv,
                        seg.sn,
                        seg.xmit
                    );
                    self.state = State::Dead;
                }

                arq_log!(
                    log_mask,
                    OUT_DATA,
                    "output psh: sn={} ts={} resendts={} rto={} fastack={} xmit={}",
                    seg.sn,
                    seg.ts,
                    seg.resendts,
                    seg.rto,
                    seg.fastack,
                    seg.xmit
                );
            }

            let remaining = time_diff(seg.resendts, now_ms);
            if remaining > 0 && remaining < min_rto {
                min_rto = remaining;
            }
        }

        Self::emit_frame(&mut self.writer, log_mask, out);

        if self.congestion_control {
            // Rate halving is applied before the timeout collapse, so a pass with both kinds of
            // loss ends with ssthresh derived from the already halved window
            if change > 0 {
                let in_flight = self.snd_nxt.wrapping_sub(self.snd_una);
                self.cc.handle_fast_retransmit(in_flight, resend_threshold);
            }

            if lost > 0 {
                self.cc.handle_timeout();
            }
        }

        min_rto as u32
    }

    /// Drives the connection. Call every few tens of milliseconds, or at the time returned by
    /// [`Kcp::check`].
    pub fn update<O>(&mut self, now_ms: u32, out: &mut O)
    where
        O: Output,
    {
        self.activate();

        if !self.updated {
            self.updated = true;
            self.ts_flush = now_ms;
        }

        let mut slap = time_diff(now_ms, self.ts_flush);

        if !(-CLOCK_SKEW_MAX_MS..CLOCK_SKEW_MAX_MS).contains(&slap) {
            self.ts_flush = now_ms;
            slap = 0;
        }

        if slap >= 0 {
            self.ts_flush = self.ts_flush.wrapping_add(self.interval);
            if time_diff(now_ms, self.ts_flush) >= 0 {
                self.ts_flush = now_ms.wrapping_add(self.interval);
            }

            self.flush(false, now_ms, out);
        }
    }

    /// When [`Kcp::update`] should next be called, assuming no `send` or `input` in between.
    pub fn check(&self, now_ms: u32) -> u32 {
        if !self.updated {
            return now_ms;
        }

        let mut ts_flush = self.ts_flush;
        let slap = time_diff(now_ms, ts_flush);

        if !(-CLOCK_SKEW_MAX_MS..CLOCK_SKEW_MAX_MS).contains(&slap) {
            ts_flush = now_ms;
        }

        if time_diff(now_ms, ts_flush) >= 0 {
            return now_ms;
        }

        let tm_flush = time_diff(ts_flush, now_ms);
        let mut tm_packet = i32::MAX;

        for seg in self.snd_buf.iter() {
            let diff = time_diff(seg.resendts, now_ms);
            if diff <= 0 {
                return now_ms;
            }
            tm_packet = tm_packet.min(diff);
        }

        let minimal = tm_packet.min(tm_flush).min(self.interval as i32);

        now_ms.wrapping_add(minimal as u32)
    }

    // Segments already cut to the current mss must still fit after a frame size change
    fn check_segments_fit(&self, mss: usize) -> Result<()> {
        let oversized = self
            .snd_queue
            .iter()
            .chain(self.snd_buf.iter())
            .any(|seg| seg.len() > mss);

        if oversized {
            return Err(Error::InvalidConfig(
                "queued segments exceed the new segment size",
            ));
        }

        Ok(())
    }

    /// Changes the frame size. The reserved prefix must still leave room for a segment.
    pub fn set_mtu(&mut self, mtu: usize) -> Result<()> {
        config::validate_frame(mtu, self.reserved)?;

        let mss = mtu - frame::OVERHEAD - self.reserved;
        self.check_segments_fit(mss)?;

        self.mtu = mtu;
        self.mss = mss;
        self.cc.set_mss(mss);
        self.writer = FrameWriter::new(mtu, self.reserved);

        Ok(())
    }

    /// Leaves `reserved` bytes at the start of every frame for the caller's own header.
    pub fn reserve_bytes(&mut self, reserved: usize) -> Result<()> {
        config::validate_frame(self.mtu, reserved)?;

        let mss = self.mtu - frame::OVERHEAD - reserved;
        self.check_segments_fit(mss)?;

        self.reserved = reserved;
        self.mss = mss;
        self.cc.set_mss(mss);
        self.writer = FrameWriter::new(self.mtu, reserved);

        Ok(())
    }

    /// `nodelay` lowers the minimum RTO and softens timeout backoff, `interval` is clamped to
    /// 10 - 5000ms, `resend` is the fast retransmit threshold (0 disables it) and `nc` turns off
    /// congestion control.
    pub fn set_nodelay(&mut self, nodelay: bool, interval: u32, resend: u32, nc: bool) {
        self.nodelay = nodelay;
        self.rtt.set_min_rto(config::min_rto(nodelay));
        self.interval = config::clamp_interval(interval);
        self.fast_resend = resend;
        self.congestion_control = !nc;
    }

    pub fn set_window_size(&mut self, snd_wnd: u32, rcv_wnd: u32) -> Result<()> {
        config::validate_windows(snd_wnd, rcv_wnd)?;

        self.snd_wnd = snd_wnd;
        self.rcv_wnd = rcv_wnd;

        Ok(())
    }

    pub fn set_stream_mode(&mut self, stream: bool) {
        self.stream = stream;
    }

    pub fn set_dead_link(&mut self, dead_link: u32) -> Result<()> {
        if dead_link == 0 {
            return Err(Error::InvalidConfig("dead_link must be at least 1"));
        }

        self.dead_link = dead_link;
        Ok(())
    }

    pub fn set_log_mask(&mut self, log_mask: LogMask) {
        self.log_mask = log_mask;
    }

    pub fn conv(&self) -> u32 {
        self.conv
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_dead(&self) -> bool {
        self.state == State::Dead
    }

    pub fn mtu(&self) -> usize {
        self.mtu
    }

    pub fn mss(&self) -> usize {
        self.mss
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn is_stream(&self) -> bool {
        self.stream
    }

    pub fn snd_wnd(&self) -> u32 {
        self.snd_wnd
    }

    pub fn rcv_wnd(&self) -> u32 {
        self.rcv_wnd
    }

    pub fn rmt_wnd(&self) -> u32 {
        self.rmt_wnd
    }

    pub fn cwnd(&self) -> u32 {
        self.cc.cwnd()
    }

    pub fn ssthresh(&self) -> u32 {
        self.cc.ssthresh()
    }

    pub fn rx_rto(&self) -> u32 {
        self.rtt.rto()
    }

    pub fn rx_minrto(&self) -> u32 {
        self.rtt.min_rto()
    }

    pub fn rx_srtt(&self) -> i32 {
        self.rtt.srtt()
    }

    pub fn snd_una(&self) -> u32 {
        self.snd_una
    }

    pub fn snd_nxt(&self) -> u32 {
        self.snd_nxt
    }

    pub fn rcv_nxt(&self) -> u32 {
        self.rcv_nxt
    }

    /// Segments not yet acknowledged, queued or in flight.
    pub fn wait_snd(&self) -> usize {
        self.snd_buf.len() + self.snd_queue.len()
    }
}
