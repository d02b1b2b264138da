use lanseek_common::config::Config;
use lanseek_common::network::interface;

use crate::terminal::{format, print};

pub fn info(cfg: &Config) {
    let profile = cfg.profile();

    print::header("platform profile", cfg.quiet);
    print::as_tree_one_level(format::profile_to_details(&profile));

    print::header("primary interface", cfg.quiet);
    match interface::select_primary_interface(&profile) {
        Some(primary) => {
            print::tree_head(&primary.to_string());
            print::as_tree_one_level(format::interface_to_details(&primary));
        }
        None => print::print_status("No interface with an external IPv4 address"),
    }
}
