use rastercomb::combine::CombinationRecord;
use serde_derive::Serialize;

/// JSON shape of the combination table. Rows are sorted by
/// ascending tuple value; ids reflect discovery order.
#[derive(Serialize)]
pub struct CombineOutput<'a> {
    pub layers: Vec<String>,
    pub total_pixels: u64,
    pub combinations: Vec<&'a CombinationRecord>,
}
