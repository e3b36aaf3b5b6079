use tokio::time::Duration;

/// Grid bounds: `[GRID_MIN_ROW, GRID_MAX_ROW) x [GRID_MIN_COL, GRID_MAX_COL)`.
pub const GRID_MIN_ROW: i32 = 0;
pub const GRID_MIN_COL: i32 = 0;
pub const GRID_MAX_ROW: i32 = 10;
pub const GRID_MAX_COL: i32 = 10;

pub const NUM_VESSELS: usize = 4;

/// Vessel lengths, in the order a fleet must request them.
pub const VESSEL_LENGTHS: [usize; NUM_VESSELS] = [2, 3, 4, 5];

/// Total cells covered by a complete fleet.
pub const TOTAL_VESSEL_CELLS: usize = 14;

/// Per-slot markers drawn on the grids.
pub const VESSEL_MARKS: [char; 2] = ['A', 'B'];
pub const HIT_MARKS: [char; 2] = ['a', 'b'];
pub const MISS_MARK: char = '*';
pub const EMPTY_MARK: char = ' ';

pub const DEFAULT_PORT: u16 = 4455;

/// How long a server waits for two participants before giving up.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(180);

/// How long a sender on an acked link waits for an acknowledgment before
/// retransmitting.
pub const ACK_WAIT: Duration = Duration::from_secs(30);

/// Transmissions of one envelope on an acked link before giving up on its
/// acknowledgment.
pub const SEND_ATTEMPTS: u32 = 3;

/// How long a handler waits for its peer to finish fleet setup.
pub const SETUP_WAIT: Duration = Duration::from_secs(15);

/// Fixed receive buffer for the datagram binding; also the hard ceiling on a
/// serialized envelope sent over it.
pub const DATAGRAM_BUFFER: usize = 2048;

/// Largest frame the stream binding will read or write.
pub const MAX_FRAME_SIZE: u32 = 65_536;

/// The class of vessel that corresponds to the given length.
pub fn vessel_name(length: usize) -> &'static str {
    match length {
        2 => "Destroyer",
        3 => "Cruiser",
        4 => "Battleship",
        5 => "Carrier",
        _ => "Nemo",
    }
}
