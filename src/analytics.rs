// src/analytics.rs
//
// Funções puras que transformam a lista de empresas nas estatísticas do
// dashboard, do PDF e do e-mail (e as fábricas no painel de resiliência).
// Nenhuma delas faz I/O ou altera a entrada.

pub mod cohort;
pub mod filter;
pub mod funnel;
pub mod grouping;
pub mod kpis;
pub mod plants;
pub mod process;
pub mod pyramid;

/// `part / whole` em %, arredondado para 1 casa. Zero quando `whole == 0`.
pub fn percent_one_decimal(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * 1000.0).round() / 10.0
}

/// `part / whole` em %, arredondado para inteiro. Zero quando `whole == 0`.
pub fn percent_rounded(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentages_never_divide_by_zero() {
        assert_eq!(percent_one_decimal(3, 0), 0.0);
        assert_eq!(percent_rounded(3, 0), 0);
    }

    #[test]
    fn percentages_round_like_the_dashboard() {
        assert_eq!(percent_one_decimal(1, 3), 33.3);
        assert_eq!(percent_one_decimal(2, 3), 66.7);
        assert_eq!(percent_rounded(1, 8), 13);
        assert_eq!(percent_rounded(1, 2), 50);
    }
}
