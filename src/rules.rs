//! Weighted predicates over a monitor's displayed number.

/// A displayed number split into its tens and ones digits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Digits {
    pub value: i32,
    pub tens: i32,
    pub ones: i32,
}

impl Digits {
    pub fn split(value: i32) -> Self {
        if value < 10 {
            Digits {
                value,
                tens: 0,
                ones: value,
            }
        } else {
            Digits {
                value,
                tens: value / 10,
                ones: value % 10,
            }
        }
    }
}

pub fn is_prime(n: i32) -> bool {
    if n <= 1 {
        return false;
    }
    if n == 2 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let boundary = (n as f64).sqrt().floor() as i32;
    (3..=boundary).step_by(2).all(|divisor| n % divisor != 0)
}

pub struct Rule {
    pub name: &'static str,
    pub weight: i32,
    pub holds: fn(Digits) -> bool,
}

const fn rule(name: &'static str, weight: i32, holds: fn(Digits) -> bool) -> Rule {
    Rule {
        name,
        weight,
        holds,
    }
}

/// Every rule is checked independently; all that hold contribute.
pub static RULES: [Rule; 18] = [
    rule("divisible by 7", 3, |d| d.value % 7 == 0),
    rule("digit sum over 10", 3, |d| d.tens + d.ones > 10),
    rule("ones is 0", 3, |d| d.ones == 0),
    rule("ones is 7", 2, |d| d.ones == 7),
    rule("divisible by 9", 2, |d| d.value % 9 == 0),
    rule("tens is 5", 2, |d| d.tens == 5),
    rule("ones below tens", 1, |d| d.ones - d.tens < 0),
    rule("prime", 1, |d| is_prime(d.value)),
    rule("ones is 4", 1, |d| d.ones == 4),
    rule("tens is 2", -1, |d| d.tens == 2),
    rule("tens is prime", -1, |d| is_prime(d.tens)),
    rule("ones is 6", -1, |d| d.ones == 6),
    rule("divisible by 6", -2, |d| d.value % 6 == 0),
    rule("ones is 8", -2, |d| d.ones == 8),
    rule("tens is 3", -2, |d| d.tens == 3),
    rule("ones follows tens", -3, |d| d.tens + 1 == d.ones),
    rule("divisible by 10", -3, |d| d.value % 10 == 0),
    rule("ones is prime", -3, |d| is_prime(d.ones)),
];

/// Iterate over the rules which hold for `value`.
pub fn matching(value: i32) -> impl Iterator<Item = &'static Rule> {
    let digits = Digits::split(value);
    RULES.iter().filter(move |rule| (rule.holds)(digits))
}

/// Sum of the weights of every rule holding for `value`.
pub fn number_score(value: i32) -> i32 {
    matching(value).map(|rule| rule.weight).sum()
}
