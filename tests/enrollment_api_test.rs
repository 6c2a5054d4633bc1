// ==========================================
// EnrollmentApi 集成测试
// ==========================================
// 测试范围:
// 1. 选课/退课的双向可见性
// 2. 重复选课、退未选课程
// 3. 课程满员
// ==========================================

mod helpers;

use academic_records::api::ApiError;
use helpers::api_test_helper::*;

#[test]
fn test_enroll_student_in_course() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let alex = env.student("Alex");
    let math = env.course("Math");

    assert!(env.student_names_of(&math).is_empty());
    assert!(env.course_names_of(&alex).is_empty());

    env.enroll(&alex, &math);

    assert_eq!(env.student_names_of(&math), vec!["Alex"]);
    assert_eq!(env.course_names_of(&alex), vec!["Math"]);
}

#[test]
fn test_enroll_重复选课() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let alex = env.student("Alex");
    let math = env.course("Math");

    env.enroll(&alex, &math);

    let result = env.enrollment_api.enroll(alex.student_id, math.course_id);
    match result {
        Err(ApiError::AlreadyEnrolled {
            student_id,
            course_id,
        }) => {
            assert_eq!(student_id, alex.student_id);
            assert_eq!(course_id, math.course_id);
        }
        other => panic!("Expected AlreadyEnrolled, got {:?}", other),
    }
}

#[test]
fn test_disenroll_student_from_course() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let alex = env.student("Alex");
    let math = env.course("Math");

    env.enroll(&alex, &math);
    env.enrollment_api
        .disenroll(alex.student_id, math.course_id)
        .expect("退课失败");

    assert!(env.student_names_of(&math).is_empty());
    assert!(env.course_names_of(&alex).is_empty());
}

#[test]
fn test_disenroll_未选课为空操作() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let alex = env.student("Alex");
    let math = env.course("Math");

    env.enrollment_api
        .disenroll(alex.student_id, math.course_id)
        .expect("未选课退课不应报错");

    assert!(env.student_names_of(&math).is_empty());
    assert!(env.course_names_of(&alex).is_empty());

    // 空操作不留痕
    assert!(env
        .action_log_repo
        .find_by_course(math.course_id)
        .unwrap()
        .iter()
        .all(|log| log.action_type != "DISENROLL"));
}

#[test]
fn test_too_many_students_in_course() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let calculus = env.course("Calculus");

    for i in 0..21 {
        let student = env.student(&format!("Alex{}", i));
        let result = env.enrollment_api.enroll(student.student_id, calculus.course_id);
        if i < 20 {
            assert!(result.is_ok(), "第{}个学生应选课成功", i + 1);
        } else {
            assert!(matches!(
                result,
                Err(ApiError::CapacityExceeded { capacity: 20, .. })
            ));
        }
    }

    assert_eq!(env.enrollment_api.count_students(calculus.course_id).unwrap(), 20);
}

#[test]
fn test_with_many_courses_and_many_students() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let alex = env.student("Alex");
    let jordan = env.student("Jordan");
    let math = env.course("Math");
    let biology = env.course("Biology");

    env.enroll(&alex, &math);
    env.enroll(&jordan, &biology);
    env.enroll(&alex, &biology);

    assert_eq!(env.course_names_of(&alex), vec!["Math", "Biology"]);
    assert_eq!(env.course_names_of(&jordan), vec!["Biology"]);
    assert_eq!(env.student_names_of(&biology), vec!["Alex", "Jordan"]);
    assert_eq!(env.student_names_of(&math), vec!["Alex"]);

    env.enrollment_api
        .disenroll(alex.student_id, biology.course_id)
        .unwrap();
    assert_eq!(env.course_names_of(&alex), vec!["Math"]);
    assert_eq!(env.student_names_of(&biology), vec!["Jordan"]);

    env.enrollment_api
        .disenroll(jordan.student_id, math.course_id)
        .unwrap();
    assert_eq!(env.course_names_of(&jordan), vec!["Biology"]);
    assert_eq!(env.student_names_of(&math), vec!["Alex"]);
}

#[test]
fn test_enroll_disenroll_留痕() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let alex = env.student("Alex");
    let math = env.course("Math");

    env.enroll(&alex, &math);
    env.enrollment_api
        .disenroll(alex.student_id, math.course_id)
        .unwrap();

    let types: Vec<String> = env
        .action_log_repo
        .find_by_course(math.course_id)
        .unwrap()
        .into_iter()
        .map(|log| log.action_type)
        .collect();
    assert!(types.contains(&"ENROLL".to_string()));
    assert!(types.contains(&"DISENROLL".to_string()));
}

#[test]
fn test_concurrent_enroll_respects_capacity() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let calculus = env.course("Calculus");
    let ids: Vec<i64> = (0..30)
        .map(|i| env.student(&format!("Student{:02}", i)).student_id)
        .collect();

    let handles: Vec<_> = ids
        .into_iter()
        .map(|student_id| {
            let api = env.enrollment_api.clone();
            let course_id = calculus.course_id;
            std::thread::spawn(move || api.enroll(student_id, course_id))
        })
        .collect();

    let mut succeeded = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.join().expect("线程异常") {
            Ok(()) => succeeded += 1,
            Err(ApiError::CapacityExceeded { capacity: 20, .. }) => rejected += 1,
            Err(e) => panic!("unexpected error: {:?}", e),
        }
    }

    assert_eq!(succeeded, 20);
    assert_eq!(rejected, 10);
    assert_eq!(env.enrollment_api.count_students(calculus.course_id).unwrap(), 20);
}

#[test]
fn test_stored_capacity_cannot_exceed_default() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    {
        let conn = academic_records::db::open_sqlite_connection(&env.db_path).unwrap();
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', 'course_capacity', '25')",
            [],
        )
        .unwrap();
    }

    let state = academic_records::AppState::new(env.db_path.clone()).expect("重建AppState失败");
    assert_eq!(state.enrollment_api.capacity(), 20);

    let calculus = state.roster_api.create_course("Calculus").unwrap();
    for i in 0..21 {
        let student = state.roster_api.create_student(&format!("Alex{}", i)).unwrap();
        let result = state.enrollment_api.enroll(student.student_id, calculus.course_id);
        if i < 20 {
            assert!(result.is_ok());
        } else {
            assert!(matches!(result, Err(ApiError::CapacityExceeded { .. })));
        }
    }
}
