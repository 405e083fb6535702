use libc::{can_frame, canid_t, CAN_EFF_FLAG, CAN_ERR_FLAG, CAN_MAX_DLEN, CAN_RTR_FLAG};

use crate::can::{Frame, Identifier};

pub fn can_frame_default() -> can_frame {
    unsafe { std::mem::zeroed() }
}

fn id_to_canid_t(id: Identifier) -> canid_t {
    match id {
        Identifier::Standard(id) => id,
        Identifier::Extended(id) => id | CAN_EFF_FLAG,
    }
}

fn canid_t_to_id(id: canid_t) -> Identifier {
    match id & CAN_EFF_FLAG != 0 {
        true => Identifier::Extended(id & 0x1fffffff),
        false => Identifier::Standard(id & 0x7ff),
    }
}

/// Error and remote frames carry no payload worth decoding.
pub fn is_data_frame(frame: &can_frame) -> bool {
    frame.can_id & (CAN_ERR_FLAG | CAN_RTR_FLAG) == 0
}

impl From<can_frame> for Frame {
    fn from(frame: can_frame) -> Self {
        let len = (frame.can_dlc as usize).min(CAN_MAX_DLEN as usize);
        Frame {
            bus: 0,
            id: canid_t_to_id(frame.can_id),
            data: frame.data[..len].to_vec(),
            loopback: false,
        }
    }
}

impl From<&Frame> for can_frame {
    fn from(frame: &Frame) -> can_frame {
        let len = frame.data.len().min(CAN_MAX_DLEN as usize);

        let mut raw_frame = can_frame_default();
        raw_frame.can_id = id_to_canid_t(frame.id);
        raw_frame.can_dlc = len as u8;
        raw_frame.data[..len].copy_from_slice(&frame.data[..len]);

        raw_frame
    }
}
