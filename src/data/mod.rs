/// Data layer: core table type, ingestion, and sampling.
///
/// Architecture:
/// ```text
///  .csv / .ftr bytes
///        │
///        ▼
///   ┌──────────┐
///   │  ingest   │  decode by extension, fix transposition → Frame
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Frame    │  named columns of equal length
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  sample   │  bounded uniform row sample → Frame
///   └──────────┘
/// ```
pub mod frame;
pub mod ingest;
pub mod sample;
