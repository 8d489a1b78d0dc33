/*

Swiftarq is a reliable, ordered message transport layered over an unreliable datagram service. The
connection state is a plain value: the application feeds it received frames, drives it with a
clock, and hands whatever frames it emits to the transport. No sockets, threads or timers are
owned by the crate.

# Segments and frames

A segment is a 24 byte little-endian header followed by up to mss bytes of payload. Several
segments are packed back to back into a frame of at most mtu bytes. Frames may optionally start
with a reserved prefix that the transport fills with its own header (e.g. for encryption or
session routing).

There are four kinds of segment:

  PUSH  (81)  data, carrying sn and a fragment countdown
  ACK   (82)  acknowledges one sn, echoing the timestamp of the PUSH it answers
  WASK  (83)  asks the peer for its receive window
  WINS  (84)  announces the local receive window

Every segment carries the sender's receive window and the next sn it expects (una), so any
segment also acts as a cumulative acknowledgement.

# Sending

Messages larger than mss are split into up to 255 fragments, numbered so that the last fragment
carries frg = 0. In stream mode message boundaries are discarded; new data tops off the last
unsent segment and every segment is its own message.

Queued segments enter the send window when the next flush finds room, i.e. while

  snd_nxt < snd_una + min(snd_wnd, rmt_wnd, cwnd)

Each segment in flight is resent when

  - its retransmission timer expires (rto grows by the current RTO, or half of it in nodelay mode)
  - it was skipped by at least fast_resend later acknowledgements (fast retransmit)
  - it was skipped at all, and there is no new data to send (early retransmit)

A segment that has been transmitted dead_link times marks the connection as dead. This is only
reported; the connection keeps retransmitting until the owner decides to drop it.

# Congestion window

cwnd is counted in segments and starts at 1. Every input() that advances snd_una grows it by one
segment in slow start, or by roughly one segment per round trip above ssthresh. Fast or early
retransmission halves the window relative to the data in flight, while a retransmission timeout
collapses it to a single segment:

  fast:     ssthresh <- max(in_flight / 2, 2),  cwnd <- ssthresh + fast_resend
            (with fast_resend disabled, cwnd <- max(ssthresh - 1, 1))
  timeout:  ssthresh <- max(cwnd / 2, 2),       cwnd <- 1

# Round trip estimation

Each ACK for a segment in flight, arriving in a regular frame, yields an RTT sample. srtt and
rttvar are updated as in RFC 6298 with integer arithmetic, except that samples well below
srtt - rttvar shrink rttvar 8x more slowly. The retransmission timeout is

  rto <- clamp(srtt + max(interval, 4 * rttvar), minrto, 60000)

where minrto is 30ms in nodelay mode and 100ms otherwise.

# Receiving

Every PUSH below rcv_nxt + rcv_wnd is acknowledged, including data already delivered. Those at or
above rcv_nxt are stored in order with duplicates dropped, and anything beyond the window is
ignored. In-order segments move to the receive queue while it has room, and recv() hands out one
complete message at a time. A peer whose window has closed is probed with WASK after 7s, backing
off by 1.5x up to 120s. When recv() reopens a window that was full, the new window is announced
with WINS.

# Scheduling

update() flushes once per interval. check() reports when update() next needs to run, taking
pending retransmissions into account, so that idle connections can be polled less frequently.

*/

pub mod buffer;
pub mod config;
mod endpoint;
pub mod epoch;
mod error;
pub mod frame;
pub mod log;

pub use config::Config;
pub use endpoint::{Kcp, Output, Segment, State};
pub use epoch::Epoch;
pub use error::{Error, Result};
pub use log::LogMask;
