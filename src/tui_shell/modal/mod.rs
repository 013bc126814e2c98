mod draw;

pub(super) use self::draw::draw_modal;
