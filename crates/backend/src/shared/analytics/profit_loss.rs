use super::aggregator::MetricSums;
use crate::shared::format::round2;

/// Net sales and net profit derived from one window's sums
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfitLoss {
    pub net_sales: f64,
    pub net_profit: f64,
    pub margin: f64,
}

pub fn net_sales(gross_sales: f64, refund: f64) -> f64 {
    gross_sales - refund.abs()
}

/// Every cost term is subtracted as a magnitude. Reimbursements are added
/// with their sign, so a reversal lowers profit.
pub fn net_profit(
    net_sales: f64,
    market_place_fee: f64,
    other_fee: f64,
    total_cogs: f64,
    ad_spend: f64,
    reimbursement: f64,
) -> f64 {
    net_sales - market_place_fee.abs() - other_fee.abs() - total_cogs.abs() - ad_spend.abs()
        + reimbursement
}

impl ProfitLoss {
    pub fn from_sums(sums: &MetricSums) -> Self {
        let net_sales = net_sales(sums.gross_sales, sums.refund);
        let net_profit = net_profit(
            net_sales,
            sums.market_place_fee,
            sums.other_fee,
            sums.total_cogs,
            sums.ad_spend,
            sums.reimbursement,
        );
        Self {
            net_sales,
            net_profit,
            margin: ratio_percent(net_profit, net_sales),
        }
    }
}

/// `numerator / denominator * 100`, zero when the denominator is zero
pub fn ratio_percent(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        round2(numerator / denominator * 100.0)
    }
}

/// Plain ratio, zero when the denominator is zero
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        round2(numerator / denominator)
    }
}

/// Ad efficiency ratios for one window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdRatios {
    /// spend / ad sales, percent
    pub acos: f64,
    /// spend / total gross sales, percent
    pub tacos: f64,
    /// ad sales / spend
    pub roas: f64,
    /// clicks / impressions, percent
    pub ctr: f64,
    /// spend / clicks
    pub cpc: f64,
}

impl AdRatios {
    pub fn from_sums(sums: &MetricSums) -> Self {
        let spend = sums.ad_spend.abs();
        Self {
            acos: ratio_percent(spend, sums.ad_sales),
            tacos: ratio_percent(spend, sums.gross_sales),
            roas: ratio(sums.ad_sales, spend),
            ctr: ratio_percent(sums.clicks as f64, sums.impressions as f64),
            cpc: ratio(spend, sums.clicks as f64),
        }
    }
}

/// Orders per session, percent
pub fn conversion_rate(sums: &MetricSums) -> f64 {
    ratio_percent(sums.order_count as f64, sums.sessions as f64)
}

/// Gross sales per order
pub fn average_order_value(sums: &MetricSums) -> f64 {
    ratio(sums.gross_sales, sums.order_count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_net_profit_example() {
        let sales = net_sales(1000.0, 100.0);
        assert_eq!(sales, 900.0);
        assert_eq!(net_profit(sales, -150.0, 20.0, 100.0, 80.0, 30.0), 580.0);
    }

    #[test]
    fn test_net_profit_mixed_sign_inputs() {
        // gross 1000, refund 50, fee -100, cogs -200, other -10, ads -30, reimbursement 20
        let sales = net_sales(1000.0, 50.0);
        assert_eq!(sales, 950.0);
        assert_eq!(net_profit(sales, -100.0, -10.0, -200.0, -30.0, 20.0), 630.0);
        assert_eq!(
            net_profit(sales, -100.0, -10.0, -200.0, -30.0, 20.0),
            (1000.0 - 50.0) - 100.0 - 10.0 - 200.0 - 30.0 + 20.0
        );
    }

    #[test]
    fn test_reimbursement_reversal_lowers_profit() {
        let sales = net_sales(100.0, 0.0);
        assert_eq!(net_profit(sales, 0.0, 0.0, 0.0, 0.0, 15.0), 115.0);
        assert_eq!(net_profit(sales, 0.0, 0.0, 0.0, 0.0, -15.0), 85.0);
    }

    #[test]
    fn test_profit_loss_from_sums() {
        let sums = MetricSums {
            gross_sales: 1000.0,
            refund: 100.0,
            market_place_fee: -150.0,
            other_fee: -20.0,
            total_cogs: 100.0,
            ad_spend: 80.0,
            reimbursement: 30.0,
            ..MetricSums::default()
        };
        let pl = ProfitLoss::from_sums(&sums);
        assert_eq!(pl.net_sales, 900.0);
        assert_eq!(pl.net_profit, 580.0);
        assert_eq!(pl.margin, 64.44);
    }

    #[test]
    fn test_ratios_are_zero_safe() {
        let ratios = AdRatios::from_sums(&MetricSums::default());
        assert_eq!(ratios.acos, 0.0);
        assert_eq!(ratios.roas, 0.0);
        assert_eq!(conversion_rate(&MetricSums::default()), 0.0);

        let sums = MetricSums {
            gross_sales: 400.0,
            ad_spend: 50.0,
            ad_sales: 200.0,
            impressions: 1000,
            clicks: 25,
            ..MetricSums::default()
        };
        let ratios = AdRatios::from_sums(&sums);
        assert_eq!(ratios.acos, 25.0);
        assert_eq!(ratios.tacos, 12.5);
        assert_eq!(ratios.roas, 4.0);
        assert_eq!(ratios.ctr, 2.5);
        assert_eq!(ratios.cpc, 2.0);
    }
}
