use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};

use crate::{
    errors::{AppError, AppResult},
    grading::{grade_for_percentage, is_passing, Grade},
    models::domain::ClassTest,
    models::dto::reports::{
        ClassSubjectReport, ClassSubjectSummary, ClassWiseReport, ClassWiseSummary,
        DateRangeReport, GradeCount, PassStatus, PerformanceOverall, PerformanceReport,
        RankedStudent, ScoreHistoryEntry, StubMetric, StudentStanding, StudentSubjectReport,
        StudentTestEntry, SubjectAverage, SubjectPerformance, SubjectRollup, WeeklyTrendPoint,
    },
    models::dto::request::DateRangeQuery,
    models::dto::response::round2,
    repositories::{ClassRepository, ClassTestRepository, StudentRepository},
};

/// Historical placeholder values for the metrics the performance report
/// cannot compute yet. Kept for dashboard continuity; the response flags
/// them as estimated.
const ATTENDANCE_RATE_PLACEHOLDER: f64 = 75.0;
const COMPLETION_RATE_PLACEHOLDER: f64 = 90.0;

/// Unweighted mean of per-test averages. Every test counts the same
/// regardless of roster size or total marks.
pub fn mean_of_averages(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// True weighted mean as a percentage: total obtained over total
/// possible. Intentionally distinct from `mean_of_averages`; the
/// performance report weighs by marks while the other reports average
/// per-test averages, and the two must not be silently unified.
pub fn weighted_mean(total_obtained: f64, total_possible: f64) -> f64 {
    if total_possible <= 0.0 {
        return 0.0;
    }
    total_obtained / total_possible * 100.0
}

/// The Sunday that starts the week containing `date`.
pub fn week_start_sunday(date: DateTime<Utc>) -> NaiveDate {
    let days_from_sunday = date.weekday().num_days_from_sunday() as u64;
    date.date_naive() - Days::new(days_from_sunday)
}

/// Read-only reporting over published tests. All queries are scoped by an
/// explicit owner id; a filter that matches nothing yields the explicit
/// empty shape, while a missing class or student is a 404.
pub struct ReportService {
    tests: Arc<dyn ClassTestRepository>,
    classes: Arc<dyn ClassRepository>,
    students: Arc<dyn StudentRepository>,
}

impl ReportService {
    pub fn new(
        tests: Arc<dyn ClassTestRepository>,
        classes: Arc<dyn ClassRepository>,
        students: Arc<dyn StudentRepository>,
    ) -> Self {
        Self {
            tests,
            classes,
            students,
        }
    }

    async fn require_class(&self, owner_id: &str, class_id: &str) -> AppResult<()> {
        self.classes
            .find_by_id(owner_id, class_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Class with id '{}' not found", class_id)))?;
        Ok(())
    }

    /// Summary shared by the class-wise and date-range reports.
    ///
    /// `total_students` comes from the first test's roster. That is only
    /// correct when every matched test has the same roster size; when it
    /// does not, the summary is flagged approximate rather than silently
    /// trusted.
    fn class_wise_summary(tests: &[ClassTest]) -> ClassWiseSummary {
        let total_tests = tests.len() as i64;
        let averages: Vec<f64> = tests.iter().map(|t| t.average_marks).collect();
        let total_pass_count: i64 = tests.iter().map(|t| t.pass_count).sum();
        let total_students = tests[0].student_marks.len() as i64;
        let approximate = tests
            .iter()
            .any(|t| t.student_marks.len() as i64 != total_students);

        let graded_slots = total_tests * total_students;
        let pass_percentage = if graded_slots > 0 {
            round2(total_pass_count as f64 / graded_slots as f64 * 100.0)
        } else {
            0.0
        };

        ClassWiseSummary {
            total_tests,
            overall_average: round2(mean_of_averages(&averages)),
            total_pass_count,
            total_students,
            pass_percentage,
            approximate,
        }
    }

    /// Group per-test averages by subject, best-performing subject first.
    fn subject_breakdown(tests: &[ClassTest]) -> Vec<SubjectRollup> {
        let mut order: Vec<String> = Vec::new();
        let mut grouped: HashMap<String, Vec<f64>> = HashMap::new();

        for test in tests {
            if !grouped.contains_key(&test.subject_name) {
                order.push(test.subject_name.clone());
            }
            grouped
                .entry(test.subject_name.clone())
                .or_default()
                .push(test.average_marks);
        }

        let mut rollups: Vec<SubjectRollup> = order
            .into_iter()
            .map(|subject_name| {
                let averages = &grouped[&subject_name];
                SubjectRollup {
                    total_tests: averages.len() as i64,
                    average_score: round2(mean_of_averages(averages)),
                    highest_average: round2(averages.iter().cloned().fold(f64::MIN, f64::max)),
                    lowest_average: round2(averages.iter().cloned().fold(f64::MAX, f64::min)),
                    subject_name,
                }
            })
            .collect();

        rollups.sort_by(|a, b| {
            b.average_score
                .partial_cmp(&a.average_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        rollups
    }

    pub async fn class_wise(&self, owner_id: &str, class_id: &str) -> AppResult<ClassWiseReport> {
        self.require_class(owner_id, class_id).await?;

        let tests = self.tests.find_published_by_class(owner_id, class_id).await?;
        if tests.is_empty() {
            return Ok(ClassWiseReport::empty());
        }

        let summary = Self::class_wise_summary(&tests);
        let subject_breakdown = Self::subject_breakdown(&tests);

        Ok(ClassWiseReport {
            tests: tests.into_iter().map(Into::into).collect(),
            summary,
            subject_breakdown,
        })
    }

    pub async fn class_subject(
        &self,
        owner_id: &str,
        class_id: &str,
        subject_name: &str,
    ) -> AppResult<ClassSubjectReport> {
        self.require_class(owner_id, class_id).await?;

        let tests = self
            .tests
            .find_published_by_class_subject(owner_id, class_id, subject_name)
            .await?;
        if tests.is_empty() {
            return Ok(ClassSubjectReport::empty());
        }

        // The overall percentage divides by the first test's total marks
        // for every test; flag the result when totals are not uniform.
        let reference_total = tests[0].total_marks;
        let reference_roster = tests[0].student_marks.len() as i64;
        let approximate = tests.iter().any(|t| {
            t.total_marks != reference_total
                || t.student_marks.len() as i64 != reference_roster
        });

        struct Accumulator {
            student_name: String,
            roll_no: String,
            tests_taken: i64,
            total_marks: f64,
            score_history: Vec<ScoreHistoryEntry>,
        }

        let mut order: Vec<String> = Vec::new();
        let mut per_student: HashMap<String, Accumulator> = HashMap::new();

        for test in &tests {
            for mark in &test.student_marks {
                let acc = per_student
                    .entry(mark.student_id.clone())
                    .or_insert_with(|| {
                        order.push(mark.student_id.clone());
                        Accumulator {
                            student_name: mark.student_name.clone(),
                            roll_no: mark.roll_no.clone(),
                            tests_taken: 0,
                            total_marks: 0.0,
                            score_history: Vec::new(),
                        }
                    });

                acc.tests_taken += 1;
                acc.total_marks += mark.obtained_marks;
                acc.score_history.push(ScoreHistoryEntry {
                    test_id: test.id.clone(),
                    test_name: test.test_name.clone(),
                    test_date: test.test_date,
                    obtained_marks: mark.obtained_marks,
                    total_marks: test.total_marks,
                    percentage: round2(mark.obtained_marks / test.total_marks * 100.0),
                });
            }
        }

        let mut students: Vec<StudentStanding> = order
            .into_iter()
            .map(|student_id| {
                let acc = per_student.remove(&student_id).expect("accumulated above");
                let average_score = acc.total_marks / acc.tests_taken as f64;
                let overall_percentage =
                    acc.total_marks / (acc.tests_taken as f64 * reference_total) * 100.0;

                StudentStanding {
                    student_id,
                    student_name: acc.student_name,
                    roll_no: acc.roll_no,
                    tests_taken: acc.tests_taken,
                    total_marks: acc.total_marks,
                    average_score: round2(average_score),
                    overall_percentage: round2(overall_percentage),
                    rank: 0,
                    grade: grade_for_percentage(overall_percentage),
                    score_history: acc.score_history,
                }
            })
            .collect();

        // Stable sort: ties keep their accumulation order.
        students.sort_by(|a, b| {
            b.average_score
                .partial_cmp(&a.average_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for (index, standing) in students.iter_mut().enumerate() {
            standing.rank = index as i64 + 1;
        }

        let total_tests = tests.len() as i64;
        let averages: Vec<f64> = tests.iter().map(|t| t.average_marks).collect();
        let total_pass: i64 = tests.iter().map(|t| t.pass_count).sum();
        let graded_slots = total_tests * reference_roster;

        let summary = ClassSubjectSummary {
            total_tests,
            average_score: round2(mean_of_averages(&averages)),
            highest_score: tests.iter().map(|t| t.highest_marks).fold(f64::MIN, f64::max),
            lowest_score: tests.iter().map(|t| t.lowest_marks).fold(f64::MAX, f64::min),
            pass_rate: if graded_slots > 0 {
                round2(total_pass as f64 / graded_slots as f64 * 100.0)
            } else {
                0.0
            },
        };

        Ok(ClassSubjectReport {
            students,
            summary,
            approximate,
        })
    }

    pub async fn student_subject(
        &self,
        owner_id: &str,
        student_id: &str,
    ) -> AppResult<StudentSubjectReport> {
        let student = self
            .students
            .find_by_id(owner_id, student_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Student with id '{}' not found", student_id))
            })?;

        // Most recent first, straight from the repository ordering.
        let tests = self
            .tests
            .find_published_for_student(owner_id, student_id)
            .await?;

        let mut test_history: Vec<StudentTestEntry> = Vec::new();
        for test in &tests {
            let Some(mark) = test
                .student_marks
                .iter()
                .find(|m| m.student_id == student_id)
            else {
                continue;
            };
            test_history.push(StudentTestEntry {
                test_id: test.id.clone(),
                test_name: test.test_name.clone(),
                subject_name: test.subject_name.clone(),
                test_date: test.test_date,
                obtained_marks: mark.obtained_marks,
                total_marks: test.total_marks,
                percentage: round2(mark.obtained_marks / test.total_marks * 100.0),
            });
        }

        struct SubjectAcc {
            tests_taken: i64,
            total_obtained: f64,
            total_percentage: f64,
            highest_score: f64,
            lowest_score: f64,
        }

        let mut order: Vec<String> = Vec::new();
        let mut grouped: HashMap<String, SubjectAcc> = HashMap::new();

        for entry in &test_history {
            let acc = grouped
                .entry(entry.subject_name.clone())
                .or_insert_with(|| {
                    order.push(entry.subject_name.clone());
                    SubjectAcc {
                        tests_taken: 0,
                        total_obtained: 0.0,
                        total_percentage: 0.0,
                        highest_score: f64::MIN,
                        lowest_score: f64::MAX,
                    }
                });
            acc.tests_taken += 1;
            acc.total_obtained += entry.obtained_marks;
            acc.total_percentage += entry.percentage;
            acc.highest_score = acc.highest_score.max(entry.obtained_marks);
            acc.lowest_score = acc.lowest_score.min(entry.obtained_marks);
        }

        let subjects: Vec<SubjectPerformance> = order
            .into_iter()
            .map(|subject_name| {
                let acc = grouped.remove(&subject_name).expect("accumulated above");
                let taken = acc.tests_taken as f64;
                SubjectPerformance {
                    subject_name,
                    tests_taken: acc.tests_taken,
                    average_score: round2(acc.total_obtained / taken),
                    average_percentage: round2(acc.total_percentage / taken),
                    highest_score: acc.highest_score,
                    lowest_score: acc.lowest_score,
                }
            })
            .collect();

        let percentages: Vec<f64> = test_history.iter().map(|e| e.percentage).collect();

        Ok(StudentSubjectReport {
            student_id: student.id,
            student_name: student.name,
            subjects_taken: subjects.len() as i64,
            subjects,
            total_tests: test_history.len() as i64,
            overall_average: round2(mean_of_averages(&percentages)),
            test_history,
        })
    }

    pub async fn date_range(
        &self,
        owner_id: &str,
        query: DateRangeQuery,
    ) -> AppResult<DateRangeReport> {
        if query.start_date > query.end_date {
            return Err(AppError::ValidationError(
                "start_date must not be after end_date".to_string(),
            ));
        }

        let tests = self
            .tests
            .find_published_in_range(
                owner_id,
                query.start_date,
                query.end_date,
                query.class_id,
                query.subject_name,
            )
            .await?;
        if tests.is_empty() {
            return Ok(DateRangeReport::empty());
        }

        let summary = Self::class_wise_summary(&tests);

        // Tests arrive ascending by date, so bucket-insertion order is
        // chronological here.
        struct WeekAcc {
            count: i64,
            sum: f64,
        }
        let mut order: Vec<NaiveDate> = Vec::new();
        let mut buckets: HashMap<NaiveDate, WeekAcc> = HashMap::new();

        for test in &tests {
            let week = week_start_sunday(test.test_date);
            let acc = buckets.entry(week).or_insert_with(|| {
                order.push(week);
                WeekAcc { count: 0, sum: 0.0 }
            });
            acc.count += 1;
            acc.sum += test.average_marks;
        }

        let weekly_trend: Vec<WeeklyTrendPoint> = order
            .into_iter()
            .map(|week| {
                let acc = &buckets[&week];
                WeeklyTrendPoint {
                    week: week.format("%Y-%m-%d").to_string(),
                    average_score: round2(acc.sum / acc.count as f64),
                }
            })
            .collect();

        Ok(DateRangeReport {
            tests: tests.into_iter().map(Into::into).collect(),
            summary,
            weekly_trend,
        })
    }

    pub async fn performance(
        &self,
        owner_id: &str,
        class_id: &str,
    ) -> AppResult<PerformanceReport> {
        self.require_class(owner_id, class_id).await?;

        let tests = self.tests.find_published_by_class(owner_id, class_id).await?;
        if tests.is_empty() {
            return Ok(PerformanceReport::empty());
        }

        let subject_performance: Vec<SubjectAverage> = Self::subject_breakdown(&tests)
            .into_iter()
            .map(|rollup| SubjectAverage {
                subject_name: rollup.subject_name,
                tests: rollup.total_tests,
                average_score: rollup.average_score,
            })
            .collect();

        // Unlike the other reports this accumulates obtained and possible
        // marks per student, a true weighted average.
        struct StudentAcc {
            student_name: String,
            roll_no: String,
            tests_taken: i64,
            total_obtained: f64,
            total_possible: f64,
        }

        let mut order: Vec<String> = Vec::new();
        let mut per_student: HashMap<String, StudentAcc> = HashMap::new();

        for test in &tests {
            for mark in &test.student_marks {
                let acc = per_student
                    .entry(mark.student_id.clone())
                    .or_insert_with(|| {
                        order.push(mark.student_id.clone());
                        StudentAcc {
                            student_name: mark.student_name.clone(),
                            roll_no: mark.roll_no.clone(),
                            tests_taken: 0,
                            total_obtained: 0.0,
                            total_possible: 0.0,
                        }
                    });
                acc.tests_taken += 1;
                acc.total_obtained += mark.obtained_marks;
                acc.total_possible += test.total_marks;
            }
        }

        let mut ranked: Vec<RankedStudent> = order
            .into_iter()
            .map(|student_id| {
                let acc = per_student.remove(&student_id).expect("accumulated above");
                let average_percentage = weighted_mean(acc.total_obtained, acc.total_possible);

                RankedStudent {
                    student_id,
                    student_name: acc.student_name,
                    roll_no: acc.roll_no,
                    tests_taken: acc.tests_taken,
                    total_obtained: acc.total_obtained,
                    total_possible: acc.total_possible,
                    average_percentage: round2(average_percentage),
                    grade: grade_for_percentage(average_percentage),
                    status: if is_passing(average_percentage) {
                        PassStatus::Pass
                    } else {
                        PassStatus::Fail
                    },
                    rank: 0,
                }
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.average_percentage
                .partial_cmp(&a.average_percentage)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for (index, student) in ranked.iter_mut().enumerate() {
            student.rank = index as i64 + 1;
        }

        // Distribution covers every band so absent grades report as zero.
        let mut distribution: HashMap<Grade, i64> =
            Grade::ALL.iter().map(|grade| (*grade, 0)).collect();
        for student in &ranked {
            *distribution.entry(student.grade).or_insert(0) += 1;
        }
        let grade_distribution: Vec<GradeCount> = Grade::ALL
            .iter()
            .map(|grade| GradeCount {
                grade: *grade,
                count: distribution[grade],
            })
            .collect();

        let percentages: Vec<f64> = ranked.iter().map(|s| s.average_percentage).collect();
        let pass_count = ranked
            .iter()
            .filter(|s| s.status == PassStatus::Pass)
            .count();
        let overall = PerformanceOverall {
            total_tests: tests.len() as i64,
            average_score: round2(mean_of_averages(&percentages)),
            pass_rate: round2(pass_count as f64 / ranked.len() as f64 * 100.0),
        };

        let top_performers: Vec<RankedStudent> = ranked.into_iter().take(10).collect();

        Ok(PerformanceReport {
            subject_performance,
            top_performers,
            grade_distribution,
            overall,
            attendance_rate: StubMetric::placeholder(ATTENDANCE_RATE_PLACEHOLDER),
            completion_rate: StubMetric::placeholder(COMPLETION_RATE_PLACEHOLDER),
        })
    }
}
