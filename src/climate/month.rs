use std::fmt;
use std::str::FromStr;

/// Calendar month used for sowing and climatology lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    /// Upper-case three-letter key used by the climatology service.
    pub fn code(self) -> &'static str {
        match self {
            Month::January => "JAN",
            Month::February => "FEB",
            Month::March => "MAR",
            Month::April => "APR",
            Month::May => "MAY",
            Month::June => "JUN",
            Month::July => "JUL",
            Month::August => "AUG",
            Month::September => "SEP",
            Month::October => "OCT",
            Month::November => "NOV",
            Month::December => "DEC",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Month {
    type Err = String;

    /// Accepts full names and three-letter codes in any case.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        Month::ALL
            .into_iter()
            .find(|month| {
                month.name().eq_ignore_ascii_case(value) || month.code().eq_ignore_ascii_case(value)
            })
            .ok_or_else(|| format!("Unknown month: {value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_names() {
        for month in Month::ALL {
            assert_eq!(month.code(), month.name()[..3].to_ascii_uppercase());
        }
    }

    #[test]
    fn parses_names_and_codes() {
        assert_eq!("june".parse::<Month>().unwrap(), Month::June);
        assert_eq!(" SEP ".parse::<Month>().unwrap(), Month::September);
        assert_eq!("December".parse::<Month>().unwrap(), Month::December);
        assert!("Juneteenth".parse::<Month>().is_err());
    }
}
