pub mod seeking {
    pub const SEEK_FORWARD_COURSE: f64 = 30.0;
    pub const SEEK_BACKWARD_COURSE: f64 = -15.0;
    pub const SEEK_FORWARD_FINE: f64 = 15.0;
    pub const SEEK_BACKWARD_FINE: f64 = -10.0;
}
