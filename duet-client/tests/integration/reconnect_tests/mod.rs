mod test_ice_restart;
