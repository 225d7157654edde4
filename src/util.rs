pub fn mean(data: &[f64]) -> Option<f64> {
    match data.len() {
        0 => None,
        count => Some(data.iter().sum::<f64>() / count as f64),
    }
}

/// Population standard deviation
pub fn std_dev(data: &[f64]) -> Option<f64> {
    let data_mean = mean(data)?;
    let variance = data
        .iter()
        .map(|value| {
            let diff = data_mean - *value;

            diff * diff
        })
        .sum::<f64>()
        / data.len() as f64;

    Some(variance.sqrt())
}

/// Whole percent of `part` in `whole`, 0 for an empty whole
pub fn percent(part: f64, whole: f64) -> u16 {
    if whole <= 0.0 {
        return 0;
    }
    ((part / whole) * 100.0).round().clamp(0.0, 100.0) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[250., 300., 350.]), Some(300.0));
        assert_eq!(mean(&[10., 20., 30., 15., 22.]), Some(19.4));
    }

    #[test]
    fn test_mean_single_value() {
        assert_eq!(mean(&[420.0]), Some(420.0));
    }

    #[test]
    fn test_mean_empty_slice() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_std_dev() {
        assert_eq!(std_dev(&[200., 400.]), Some(100.0));
        assert_eq!(
            std_dev(&[100., 120., 90., 102., 94.]),
            Some(10.322790320451151)
        );
    }

    #[test]
    fn test_std_dev_identical_values() {
        assert_eq!(std_dev(&[300.0, 300.0, 300.0]), Some(0.0));
    }

    #[test]
    fn test_std_dev_empty_slice() {
        assert_eq!(std_dev(&[]), None);
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(1.0, 4.0), 25);
        assert_eq!(percent(2.0, 3.0), 67);
        assert_eq!(percent(5.0, 0.0), 0);
        assert_eq!(percent(9.0, 3.0), 100);
    }
}
