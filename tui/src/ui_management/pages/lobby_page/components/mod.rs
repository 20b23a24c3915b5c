pub mod create_room_form;
pub mod join_room_form;
