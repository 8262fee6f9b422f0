use crate::config::CanonicalConfig;

/// Structural change detection between two canonicalized snapshots.
///
/// Canonicalization already fixed the order of every list field, so a plain
/// field-by-field comparison here can never misreport a reordered list as a
/// change, while content or cardinality differences still count.
pub fn has_changed(previous: &CanonicalConfig, next: &CanonicalConfig) -> bool {
    let previous = previous.config();
    let next = next.config();

    if previous.enable != next.enable
        || previous.device != next.device
        || previous.stack != next.stack
        || previous.auto_route != next.auto_route
        || previous.auto_detect_interface != next.auto_detect_interface
        || previous.mtu != next.mtu
        || previous.strict_route != next.strict_route
        || previous.endpoint_independent_nat != next.endpoint_independent_nat
        || previous.udp_timeout != next.udp_timeout
        || previous.file_descriptor != next.file_descriptor
    {
        return true;
    }

    // Slice equality checks length first, then elements in canonical order.
    previous.dns_hijack != next.dns_hijack
        || previous.inet4_address != next.inet4_address
        || previous.inet6_address != next.inet6_address
        || previous.inet4_route_address != next.inet4_route_address
        || previous.inet6_route_address != next.inet6_route_address
        || previous.include_uid != next.include_uid
        || previous.include_uid_range != next.include_uid_range
        || previous.exclude_uid != next.exclude_uid
        || previous.exclude_uid_range != next.exclude_uid_range
        || previous.include_android_user != next.include_android_user
        || previous.include_package != next.include_package
        || previous.exclude_package != next.exclude_package
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TunConfig;

    fn base_config() -> TunConfig {
        TunConfig {
            enable: true,
            device: "utun9".to_string(),
            mtu: 1500,
            dns_hijack: vec!["any:53".to_string(), "198.18.0.2:53".to_string()],
            inet4_address: vec!["198.18.0.1/30".parse().unwrap()],
            include_uid: vec![1000, 2000, 1000],
            include_package: vec!["org.example.a".to_string(), "org.example.b".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn permuted_lists_compare_equal() {
        let config = base_config();
        let mut permuted = config.clone();
        permuted.dns_hijack.reverse();
        permuted.include_uid.rotate_left(1);
        permuted.include_package.swap(0, 1);

        assert!(!has_changed(
            &config.canonicalized(),
            &permuted.canonicalized()
        ));
    }

    #[test]
    fn different_list_lengths_always_change() {
        let config = base_config();
        let mut shorter = config.clone();
        shorter.include_uid.pop();

        // Full content overlap with the remaining elements does not matter.
        assert!(has_changed(
            &config.canonicalized(),
            &shorter.canonicalized()
        ));
    }

    #[test]
    fn duplicate_cardinality_is_a_real_change() {
        let config = base_config();
        let mut deduped = config.clone();
        deduped.include_uid = vec![1000, 2000];

        assert!(has_changed(
            &config.canonicalized(),
            &deduped.canonicalized()
        ));
    }

    #[test]
    fn scalar_mismatch_changes() {
        let config = base_config();

        let mut mtu = config.clone();
        mtu.mtu = 9000;
        assert!(has_changed(&config.canonicalized(), &mtu.canonicalized()));

        let mut fd = config.clone();
        fd.file_descriptor = Some(7);
        assert!(has_changed(&config.canonicalized(), &fd.canonicalized()));
    }

    #[test]
    fn list_content_mismatch_changes() {
        let config = base_config();
        let mut other = config.clone();
        other.include_package = vec!["org.example.a".to_string(), "org.example.c".to_string()];

        assert!(has_changed(&config.canonicalized(), &other.canonicalized()));
    }

    #[test]
    fn identical_snapshots_do_not_change() {
        let config = base_config();
        assert!(!has_changed(
            &config.canonicalized(),
            &config.canonicalized()
        ));
    }
}
